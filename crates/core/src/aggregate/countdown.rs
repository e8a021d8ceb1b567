/// Whole hours, minutes and seconds left until a deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    /// Never negative: a deadline in the past yields zero.
    pub fn until(deadline: u64, now: u64) -> Self {
        Self::from_seconds(deadline.saturating_sub(now))
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}h {:02}m {:02}s", self.hours, self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_into_whole_units() {
        assert_eq!(
            Countdown::until(1_000 + 3661, 1_000),
            Countdown {
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn strictly_decreases_then_stays_at_zero() {
        let end = 10_000 + 3661;
        let mut previous = Countdown::until(end, 10_000).total_seconds();

        for now in 10_001..=end {
            let current = Countdown::until(end, now).total_seconds();
            assert!(current < previous);
            previous = current;
        }

        assert!(Countdown::until(end, end).is_zero());
        for now in end..end + 5 {
            assert_eq!(Countdown::until(end, now), Countdown::default());
        }
    }

    #[test]
    fn renders_padded() {
        assert_eq!(Countdown::from_seconds(3661).to_string(), "01h 01m 01s");
    }
}

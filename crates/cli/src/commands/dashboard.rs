use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::StreamExt;
use nouns_core::{
    BlockEstimate, BlockNumber, BlockProducer, BlockSource, ChainError, Loadable,
    OPTIMISTIC_TICK_INTERVAL, POLL_INTERVAL, ProposalRecord, StatusFilter, derive_auction_view,
    derive_proposal_views, filter_views,
};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEventKind},
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Row, Table},
};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::{
    commands::auction::{AuctionInputs, load_auction, unix_now},
    provider::AppContext,
    theme::Palette,
};

pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Resolves the RPC endpoint again on every poll.
struct EndpointBlockSource {
    ctx: AppContext,
}

#[async_trait]
impl BlockSource for EndpointBlockSource {
    async fn current_block(&self) -> Result<BlockNumber, ChainError> {
        self.ctx.reader()?.current_block().await
    }
}

struct Dashboard {
    auction: AuctionInputs,
    proposals: Loadable<Vec<ProposalRecord>>,
    estimate: BlockEstimate,
    block_error: Option<String>,
    filter: StatusFilter,
    now: u64,
    palette: Palette,
}

enum Action {
    Quit,
    Refresh,
}

pub async fn run(ctx: &AppContext, refresh: Duration, first: u32) -> eyre::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, ctx, refresh, first).await;
    ratatui::restore();
    result
}

fn delayed_interval(period: Duration) -> time::Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    ctx: &AppContext,
    refresh: Duration,
    first: u32,
) -> eyre::Result<()> {
    let mut state = Dashboard {
        auction: AuctionInputs::default(),
        proposals: Loadable::Loading,
        estimate: BlockEstimate::new(),
        block_error: None,
        filter: StatusFilter::All,
        now: unix_now(),
        palette: Palette::resolve(ctx.preferences.theme_mode(), ctx.preferences.theme_variant()),
    };

    let source = Arc::new(EndpointBlockSource { ctx: ctx.clone() });
    let mut blocks = BlockProducer::new(source, POLL_INTERVAL).into_stream();

    let mut countdown = delayed_interval(COUNTDOWN_TICK);
    let mut optimistic = delayed_interval(OPTIMISTIC_TICK_INTERVAL);
    let mut input = delayed_interval(INPUT_POLL);
    let mut reload = time::interval(refresh);

    loop {
        terminal.draw(|frame| state.render(frame, ctx))?;

        tokio::select! {
            _ = countdown.tick() => state.now = unix_now(),
            Some(polled) = blocks.next() => match polled {
                Ok(block) => {
                    state.estimate.poll_success(block);
                    state.block_error = None;
                }
                Err(err) => state.block_error = Some(err.to_string()),
            },
            _ = optimistic.tick() => state.estimate.tick(),
            _ = reload.tick() => state.reload(ctx, first).await,
            _ = input.tick() => match read_keys(&mut state)? {
                Some(Action::Quit) => break,
                Some(Action::Refresh) => reload.reset_immediately(),
                None => {}
            },
        }
    }

    Ok(())
}

fn read_keys(state: &mut Dashboard) -> eyre::Result<Option<Action>> {
    while event::poll(Duration::ZERO)? {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(Action::Quit)),
            KeyCode::Char('r') => return Ok(Some(Action::Refresh)),
            KeyCode::Char('f') | KeyCode::Tab => state.filter = next_filter(state.filter),
            _ => {}
        }
    }
    Ok(None)
}

fn next_filter(filter: StatusFilter) -> StatusFilter {
    match filter {
        StatusFilter::All => StatusFilter::Active,
        StatusFilter::Active => StatusFilter::Passed,
        StatusFilter::Passed => StatusFilter::Failed,
        StatusFilter::Failed => StatusFilter::All,
    }
}

fn filter_label(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "all",
        StatusFilter::Active => "active",
        StatusFilter::Passed => "passed",
        StatusFilter::Failed => "failed",
    }
}

impl Dashboard {
    async fn reload(&mut self, ctx: &AppContext, first: u32) {
        self.auction = load_auction(ctx).await;
        self.proposals = Loadable::from_result(ctx.indexer().proposals(first).await);
        debug!("dashboard data reloaded");
    }

    fn render(&self, frame: &mut Frame, ctx: &AppContext) {
        let [header, auction, proposals, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(9),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let base = Style::default().fg(self.palette.text).bg(self.palette.background);
        frame.render_widget(Block::default().style(base), frame.area());

        self.render_header(frame, header);
        self.render_auction(frame, auction, ctx);
        self.render_proposals(frame, proposals);

        let help = Paragraph::new("q quit  r refresh  f filter")
            .style(Style::default().fg(self.palette.muted));
        frame.render_widget(help, footer);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = match (self.estimate.current(), &self.block_error) {
            (Some(block), _) => format!("block ~{block}"),
            (None, Some(_)) => "block unavailable".to_string(),
            (None, None) => "block …".to_string(),
        };
        let line = Line::from(vec![
            Span::styled(
                "⌐◨-◨ Nouns",
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(block, Style::default().fg(self.palette.muted)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_auction(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
        let view = derive_auction_view(&self.auction.auction, &self.auction.bids, self.now, &ctx.names);
        let accent = Style::default().fg(self.palette.accent);
        let error = Style::default().fg(self.palette.error);

        let title = match view.noun_id {
            Some(noun_id) => format!(" Noun {noun_id} "),
            None => " Auction ".to_string(),
        };

        let time_left = if view.settled {
            "settled".to_string()
        } else if view.is_ended {
            "ended".to_string()
        } else {
            view.countdown_display()
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw("current bid     "),
                Span::styled(view.current_bid_display.clone(), accent),
            ]),
            Line::from(format!(
                "leading bidder  {}",
                view.leading_bidder.as_deref().unwrap_or("-")
            )),
            Line::from(vec![Span::raw("time left       "), Span::styled(time_left, accent)]),
            Line::from(format!("minimum bid     {} ETH", view.minimum_next_bid_display())),
        ];
        if let Some(err) = &view.chain_error {
            lines.push(Line::styled(format!("chain: {err}"), error));
        }
        if let Some(err) = &view.bids_error {
            lines.push(Line::styled(format!("indexer: {err}"), error));
        }

        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title(title)),
            area,
        );
    }

    fn render_proposals(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Proposals [{}] ", filter_label(self.filter));
        let block = Block::bordered().title(title);

        let records = match &self.proposals {
            Loadable::Loaded(records) => records,
            Loadable::Loading => {
                frame.render_widget(Paragraph::new("Loading…").block(block), area);
                return;
            }
            Loadable::Failed(err) => {
                let message = Paragraph::new(format!("Failed to load proposals: {err}"))
                    .style(Style::default().fg(self.palette.error))
                    .block(block);
                frame.render_widget(message, area);
                return;
            }
        };

        let views = derive_proposal_views(records.iter().cloned(), self.estimate.value());
        let rows = filter_views(&views, self.filter).into_iter().map(|view| {
            Row::new(vec![
                format!("#{}", view.record.id),
                view.collapsed.to_string(),
                view.record.title.clone(),
                format!(
                    "{} / {} / {}",
                    view.record.for_votes, view.record.against_votes, view.record.abstain_votes
                ),
                view.time_remaining.clone(),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Fill(1),
                Constraint::Length(16),
                Constraint::Length(8),
            ],
        )
        .header(
            Row::new(vec!["id", "status", "title", "for/against/abst", "left"])
                .style(Style::default().fg(self.palette.muted)),
        )
        .block(block);

        frame.render_widget(table, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_cycles_through_every_bucket() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            filter = next_filter(filter);
            seen.push(filter_label(filter));
        }
        assert_eq!(seen, vec!["active", "passed", "failed", "all"]);
    }
}

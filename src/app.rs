mod delayer;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use delayer::Delayer;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    action::Action,
    components::{
        home::Home,
        notifier::Notification,
        traits::{
            component::Component,
            handlekeyseq::{HandleKeySeq, KeySeqResult},
            handleraw::HandleRaw,
            renderable::Renderable,
        },
    },
    config::{keyparser::KeyParser, Config},
    queryworker::query::ToQueryWorker,
    tui::{Event, Tui},
};

/// Longest key sequence kept around while waiting for a binding to match
const MAX_KEY_SEQ: usize = 4;

pub struct App {
    tick_rate: f64,
    frame_rate: f64,
    component: Home,
    delayer: Delayer,
    key_stack: Vec<KeyEvent>,
    /// Queries sent to the query worker that have not been answered yet
    outstanding: usize,
    /// Quit was requested while queries were outstanding
    quitting: bool,
    should_quit: bool,
    should_render: bool,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
    query_tx: UnboundedSender<ToQueryWorker>,
    token: CancellationToken,
}

impl App {
    pub fn new(
        config: Config,
        action_tx: UnboundedSender<Action>,
        action_rx: UnboundedReceiver<Action>,
        query_tx: UnboundedSender<ToQueryWorker>,
        tick_rate: f64,
        frame_rate: f64,
        token: CancellationToken,
    ) -> Self {
        Self {
            tick_rate,
            frame_rate,
            component: Home::new(&config),
            delayer: Delayer::new(),
            key_stack: Vec::new(),
            outstanding: 0,
            quitting: false,
            should_quit: false,
            should_render: false,
            action_tx,
            action_rx,
            query_tx,
            token,
        }
    }

    pub fn home(&self) -> &Home {
        &self.component
    }

    #[cfg(test)]
    pub fn home_mut(&mut self) -> &mut Home {
        &mut self.component
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Quit was asked for and nothing is in flight anymore, or quit was asked for twice
    pub fn should_quit(&self) -> bool {
        self.should_quit || (self.quitting && self.outstanding == 0)
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate);
        tui.enter()?;
        self.action_tx.send(Home::startup())?;

        let mut input_closed = false;
        loop {
            tokio::select! {
                event = tui.next_event(), if !input_closed => {
                    let event = event.unwrap_or(Event::Closed);
                    input_closed = event == Event::Closed;
                    self.handle_event(event)?;
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action)?;
                    self.handle_actions()?;
                }
                _ = self.token.cancelled() => self.should_quit = true,
            }
            if self.should_render {
                self.should_render = false;
                tui.draw(|frame| self.component.draw(frame, frame.area()))?;
            }
            if self.should_quit() {
                break;
            }
        }
        info!("Shutting down");
        tui.exit()?;
        self.token.cancel();
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Init => self.action_tx.send(Action::Render)?,
            Event::Tick => self.action_tx.send(Action::Tick)?,
            Event::Render => self.action_tx.send(Action::Render)?,
            Event::Resize(x, y) => self.action_tx.send(Action::Resize(x, y))?,
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Closed => {
                info!("Input closed");
                self.action_tx.send(Action::Quit)?
            }
            Event::Error => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        let key = KeyParser::normalize(key);
        if self.component.is_typing() {
            self.key_stack.clear();
            if let Some(action) = self.component.handle_raw(key) {
                self.action_tx.send(action)?;
            }
            return Ok(());
        }

        self.key_stack.push(key);
        // A stale prefix is dropped by trying the newest keys on their own
        let matched = (0..self.key_stack.len())
            .find_map(|start| self.component.handle_key_seq(&self.key_stack[start..]));
        match matched {
            Some(res) => {
                debug!(
                    keys = KeyParser::keyseq_to_string(&self.key_stack),
                    "Key sequence matched"
                );
                self.key_stack.clear();
                if let KeySeqResult::ActionNeeded(action) = res {
                    self.action_tx.send(action)?;
                }
            }
            None if self.key_stack.len() >= MAX_KEY_SEQ => self.key_stack.clear(),
            None => {}
        }
        Ok(())
    }

    /// Handles everything that is already waiting in the channel
    fn handle_actions(&mut self) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            self.handle_action(action)?;
        }
        Ok(())
    }

    /// Waits for the next action and handles it
    pub async fn process_next(&mut self) -> Result<()> {
        if let Some(action) = self.action_rx.recv().await {
            self.handle_action(action)?;
        }
        Ok(())
    }

    fn send_query(&mut self, query: ToQueryWorker) -> Result<()> {
        self.outstanding += 1;
        self.query_tx.send(query)?;
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        if self.quitting || self.outstanding == 0 {
            self.should_quit = true;
            return Ok(());
        }
        self.quitting = true;
        let dropped = self.delayer.drain();
        info!(
            outstanding = self.outstanding,
            dropped = dropped.len(),
            "Waiting for requests before quitting"
        );
        self.action_tx.send(Action::Notify(Notification::info(format!(
            "Waiting for {} requests to finish. Quit again to leave now",
            self.outstanding
        ))))?;
        Ok(())
    }

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match &action {
            Action::Tick | Action::Render => {}
            // Login commands carry the password
            Action::User(user) => debug!("User command: {user}"),
            action => debug!("{action:?}"),
        }

        match &action {
            Action::Multiple(actions) => {
                for action in actions {
                    self.action_tx.send(action.clone())?;
                }
                return Ok(());
            }
            Action::ToQueryWorker(query) => {
                self.send_query(query.clone())?;
                return Ok(());
            }
            Action::DelayQuery(query, ticks) => {
                if self.quitting {
                    debug!(ticket = query.ticket, "Quitting, delayed query dropped");
                } else if let Some(replaced) = self.delayer.queue_query(query.clone(), *ticks) {
                    debug!(ticket = replaced.ticket, "Replaced delayed query");
                }
                return Ok(());
            }
            Action::FromQueryWorker(_) => {
                self.outstanding = self.outstanding.saturating_sub(1);
            }
            Action::Tick => {
                for query in self.delayer.on_tick() {
                    self.send_query(query)?;
                }
            }
            Action::Render | Action::Resize(_, _) => {
                self.should_render = true;
                return Ok(());
            }
            Action::Quit => return self.quit(),
            _ => {}
        };
        if let Some(ret) = self.component.update(action)? {
            self.action_tx.send(ret)?
        }
        Ok(())
    }
}

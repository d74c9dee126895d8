pub mod globalaction;
pub mod localaction;
pub mod useraction;

use crate::{
    components::notifier::Notification,
    queryworker::query::{FromQueryWorker, ToQueryWorker},
};
use useraction::UserAction;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Multiple(Vec<Action>),
    /// Something the user asked for, with a key or on the command line
    User(UserAction),
    ToQueryWorker(ToQueryWorker),
    FromQueryWorker(FromQueryWorker),
    /// Sends the query after the given number of ticks. A query of the same kind that is still
    /// waiting is replaced, so bursts collapse into one request.
    DelayQuery(ToQueryWorker, usize),
    Notify(Notification),
    /// Draw the next frame
    Render,
    Resize(u16, u16),
    Tick,
    Quit,
}

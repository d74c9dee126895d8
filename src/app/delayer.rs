use crate::queryworker::query::ToQueryWorker;

/// Holds queries back for a number of ticks. Only one query of each kind waits at a time; queueing
/// another one of the same kind replaces it.
pub struct Delayer {
    queries: Vec<(ToQueryWorker, usize)>,
}

impl Delayer {
    pub fn new() -> Self {
        Self { queries: vec![] }
    }

    /// Returns the query that was replaced, if any
    pub fn queue_query(&mut self, query: ToQueryWorker, delay: usize) -> Option<ToQueryWorker> {
        let ret = if let Some(pos) = self.queries.iter().position(|(in_queue, _)| {
            std::mem::discriminant(&query.query) == std::mem::discriminant(&in_queue.query)
        }) {
            Some(self.queries.remove(pos).0)
        } else {
            None
        };
        self.queries.push((query, delay));
        ret
    }

    /// Counts down every waiting query, and returns the ones that are due
    pub fn on_tick(&mut self) -> Vec<ToQueryWorker> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queries)
            .into_iter()
            .partition(|(_, ticks)| *ticks == 0);
        self.queries = waiting
            .into_iter()
            .map(|(q, ticks)| (q, ticks - 1))
            .collect();
        due.into_iter().map(|(q, _)| q).collect()
    }

    /// Empties the queue, returning what was waiting
    pub fn drain(&mut self) -> Vec<ToQueryWorker> {
        self.queries.drain(..).map(|(q, _)| q).collect()
    }
}

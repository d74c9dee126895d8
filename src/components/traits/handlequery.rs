use crate::{
    action::Action, compid::CompID, components::traits::renderable::Renderable,
    queryworker::query::ResponseType,
};

/// Components with this trait send queries to the query worker and consume the responses
pub trait HandleQuery: Renderable {
    fn handle_query(&mut self, dest: CompID, ticket: usize, res: ResponseType) -> Option<Action>;
}

use crate::model::{Order, OrderStatus, StatusChange};

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    UpdateStatus(StatusChange),
}

/// The order after a status change, with the status it left.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub previous: OrderStatus,
    pub order: Order,
}

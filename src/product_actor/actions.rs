//! Stock operations on a [`Product`](crate::model::Product), handled by
//! [`Record::handle_action`](crate::framework::Record::handle_action).

/// Custom actions for Product records.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Reads the stock level.
    CheckStock,
    /// Takes units out of stock for an order. Fails when not enough remain.
    ReserveStock(u32),
    /// Returns units from an abandoned reservation.
    ReleaseStock(u32),
}

/// What a reservation locked in: the name and price the order line is billed at.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub name: String,
    pub unit_price: u64,
    pub remaining: u32,
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    CheckStock(u32),
    ReserveStock(Reservation),
    ReleaseStock(u32),
}

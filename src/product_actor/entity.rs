//! [`Record`] implementation for [`Product`], including the stock actions.

use super::actions::{ProductAction, ProductActionResult, Reservation};
use super::ProductError;
use crate::framework::Record;
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;

#[async_trait]
impl Record for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = ProductError;

    fn from_create_params(
        id: ProductId,
        _sequence: u32,
        params: ProductCreate,
        _ctx: &(),
    ) -> Result<Self, ProductError> {
        if params.name.trim().is_empty() {
            return Err(ProductError::ValidationError("name is required".into()));
        }
        Ok(Self {
            id,
            name: params.name,
            category: params.category,
            unit_price: params.unit_price,
            stock: params.stock,
        })
    }

    /// Handles updates to the Product record.
    ///
    /// # Fields Updated
    /// - `unit_price`
    /// - `stock`
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), ProductError> {
        if let Some(unit_price) = update.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(0) | ProductAction::ReleaseStock(0) => {
                Err(ProductError::InvalidQuantity(0))
            }
            ProductAction::ReserveStock(quantity) => {
                if self.stock < quantity {
                    return Err(ProductError::InsufficientStock {
                        requested: quantity,
                        available: self.stock,
                    });
                }
                self.stock -= quantity;
                Ok(ProductActionResult::ReserveStock(Reservation {
                    name: self.name.clone(),
                    unit_price: self.unit_price,
                    remaining: self.stock,
                }))
            }
            ProductAction::ReleaseStock(quantity) => {
                self.stock = self.stock.saturating_add(quantity);
                Ok(ProductActionResult::ReleaseStock(self.stock))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jaggery() -> Product {
        Product::from_create_params(
            ProductId(1),
            1,
            ProductCreate {
                name: "Palm Jaggery".into(),
                category: "Sweeteners".into(),
                unit_price: 24_000,
                stock: 3,
            },
            &(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_reserve_then_release() {
        let mut product = jaggery();
        let reserved = product.handle_action(ProductAction::ReserveStock(2), &()).await.unwrap();
        assert_eq!(
            reserved,
            ProductActionResult::ReserveStock(Reservation {
                name: "Palm Jaggery".into(),
                unit_price: 24_000,
                remaining: 1,
            })
        );
        let released = product.handle_action(ProductAction::ReleaseStock(2), &()).await.unwrap();
        assert_eq!(released, ProductActionResult::ReleaseStock(3));
    }

    #[tokio::test]
    async fn test_reserve_more_than_available() {
        let mut product = jaggery();
        let err = product.handle_action(ProductAction::ReserveStock(4), &()).await.unwrap_err();
        assert_eq!(err, ProductError::InsufficientStock { requested: 4, available: 3 });
        assert_eq!(product.stock, 3);
    }

    #[tokio::test]
    async fn test_zero_quantity_is_refused() {
        let mut product = jaggery();
        let err = product.handle_action(ProductAction::ReserveStock(0), &()).await.unwrap_err();
        assert_eq!(err, ProductError::InvalidQuantity(0));
    }
}

use crate::customer_actor::CustomerError;
use crate::framework::{CollectionClient, RecordClient, StoreError};
use crate::model::{Customer, CustomerCreate, CustomerId, CustomerUpdate};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Customer collection.
#[derive(Clone)]
pub struct CustomerClient {
    inner: CollectionClient<Customer>,
}

impl CustomerClient {
    pub fn new(inner: CollectionClient<Customer>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn register(&self, params: CustomerCreate) -> Result<CustomerId, CustomerError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, CustomerError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl RecordClient<Customer> for CustomerClient {
    type Error = CustomerError;

    fn inner(&self) -> &CollectionClient<Customer> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        match e {
            StoreError::NotFound(id) => CustomerError::NotFound(id),
            other => other
                .downcast_rejection::<CustomerError>()
                .unwrap_or_else(|e| CustomerError::ActorCommunicationError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockCollection;
    use crate::model::Role;

    #[tokio::test]
    async fn test_get_maps_missing_to_none() {
        let mut mock = MockCollection::<Customer>::new();
        mock.expect_get(CustomerId(9)).return_ok(None);
        let client = CustomerClient::new(mock.client());

        assert!(client.get(CustomerId(9)).await.unwrap().is_none());
        mock.verify();
    }

    #[tokio::test]
    async fn test_register_surfaces_validation_error() {
        let mut mock = MockCollection::<Customer>::new();
        mock.expect_create().return_err(StoreError::Rejected(Box::new(
            CustomerError::ValidationError("invalid email: x".into()),
        )));
        let client = CustomerClient::new(mock.client());

        let err = client
            .register(CustomerCreate {
                name: "Arun".into(),
                email: "x".into(),
                role: Role::Customer,
            })
            .await
            .unwrap_err();
        assert_eq!(err, CustomerError::ValidationError("invalid email: x".into()));
        mock.verify();
    }
}

//! Mocks of the domain ports shared by the use case tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use uuid::Uuid;

use crate::domain::broker::{BrokerError, Delivery, MessageConsumer, MessagePublisher};
use crate::domain::cache::{Cache, CacheError};
use crate::domain::cart::model::{CartEntry, CartLineItem, NewCartLineItem};
use crate::domain::cart::repository::{CartRepository, CreateOutcome};
use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;
use crate::domain::product::model::Product;
use crate::domain::product::repository::ProductRepository;
use crate::domain::shared::value_objects::{CartItemId, ProductId, UserId};

mock! {
    pub CartRepo {}

    #[async_trait]
    impl CartRepository for CartRepo {
        async fn create(&self, item: &NewCartLineItem, source_message_id: Option<Uuid>) -> Result<CreateOutcome, RepositoryError>;
        async fn was_applied(&self, source_message_id: Uuid) -> Result<bool, RepositoryError>;
        async fn get_by_user(&self, user_id: UserId) -> Result<Vec<CartEntry>, RepositoryError>;
        async fn get_by_id(&self, id: CartItemId, user_id: UserId) -> Result<CartEntry, RepositoryError>;
        async fn update(&self, item: &CartLineItem) -> Result<(), RepositoryError>;
        async fn delete(&self, id: CartItemId, user_id: UserId) -> Result<(), RepositoryError>;
    }
}

mock! {
    pub ProductRepo {}

    #[async_trait]
    impl ProductRepository for ProductRepo {
        async fn get_by_id(&self, id: ProductId) -> Result<Product, RepositoryError>;
    }
}

mock! {
    pub Publisher {}

    #[async_trait]
    impl MessagePublisher for Publisher {
        async fn publish(&self, queue: &str, content_type: &str, payload: &[u8]) -> Result<Uuid, BrokerError>;
    }
}

mock! {
    pub Consumer {}

    #[async_trait]
    impl MessageConsumer for Consumer {
        async fn receive(&self) -> Result<Option<Delivery>, BrokerError>;
        async fn ack(&self, delivery: &Delivery) -> Result<(), BrokerError>;
        async fn nack(
            &self,
            delivery: &Delivery,
            requeue: bool,
            reason: &str,
        ) -> Result<(), BrokerError>;
    }
}

mock! {
    pub KvCache {}

    #[async_trait]
    impl Cache for KvCache {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
        async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;
        async fn delete(&self, key: &str) -> Result<(), CacheError>;
    }
}

mock! {
    pub Log {}

    impl Logger for Log {
        fn info(&self, message: &str);
        fn warn(&self, message: &str);
        fn error(&self, message: &str);
        fn debug(&self, message: &str);
    }
}

pub fn mock_logger() -> Arc<dyn Logger> {
    let mut logger = MockLog::new();
    logger.expect_info().returning(|_| ());
    logger.expect_warn().returning(|_| ());
    logger.expect_error().returning(|_| ());
    logger.expect_debug().returning(|_| ());
    Arc::new(logger)
}

pub fn product(id: u64, stock: i32) -> Product {
    Product::from_repository(ProductId::new(id), "Coffee beans".to_string(), 12.5, stock)
}

pub fn line_item(id: u64, user_id: u64, product_id: u64, quantity: i32) -> CartLineItem {
    let now = Utc::now();
    CartLineItem::from_repository(
        CartItemId::new(id),
        UserId::new(user_id),
        ProductId::new(product_id),
        quantity,
        now,
        now,
        None,
    )
}

pub fn cart_entry(id: u64, user_id: u64, product_id: u64, quantity: i32) -> CartEntry {
    CartEntry {
        item: line_item(id, user_id, product_id, quantity),
        product_name: "Coffee beans".to_string(),
        product_price: 12.5,
    }
}

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use business::application::cart::add_to_cart::AddToCartUseCaseImpl;
use business::application::cart::apply_mutation::ApplyCartMutationUseCaseImpl;
use business::application::cart::get_cart::GetCartUseCaseImpl;
use business::application::cart::worker::{CartWorker, Disposition};
use business::domain::broker::{
    BrokerError, CART_QUEUE, Delivery, JSON_CONTENT_TYPE, MessageConsumer, MessagePublisher,
};
use business::domain::cache::{Cache, CacheError};
use business::domain::cart::errors::CartError;
use business::domain::cart::model::{CartEntry, CartLineItem, NewCartLineItem};
use business::domain::cart::repository::{CartRepository, CreateOutcome};
use business::domain::cart::use_cases::add_to_cart::{AddToCartParams, AddToCartUseCase};
use business::domain::cart::use_cases::get_cart::{GetCartParams, GetCartUseCase};
use business::domain::errors::RepositoryError;
use business::domain::logger::Logger;
use business::domain::product::model::Product;
use business::domain::product::repository::ProductRepository;
use business::domain::shared::value_objects::{CartItemId, ProductId, UserId};

struct SilentLogger;

impl Logger for SilentLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
}

#[derive(Clone)]
struct QueuedMessage {
    id: Uuid,
    content_type: String,
    payload: Vec<u8>,
    attempts: u32,
    last_error: Option<String>,
}

#[derive(Default)]
struct InMemoryBroker {
    ready: Mutex<VecDeque<QueuedMessage>>,
    in_flight: Mutex<HashMap<Uuid, QueuedMessage>>,
    dead: Mutex<Vec<QueuedMessage>>,
}

impl InMemoryBroker {
    fn ready_len(&self) -> usize {
        self.ready.lock().unwrap().len()
    }

    fn dead_len(&self) -> usize {
        self.dead.lock().unwrap().len()
    }

    fn dead_reasons(&self) -> Vec<Option<String>> {
        self.dead
            .lock()
            .unwrap()
            .iter()
            .map(|message| message.last_error.clone())
            .collect()
    }

    /// Puts an in-flight message back as if its lease had expired before the ack.
    fn expire_lease(&self, delivery: &Delivery) {
        if let Some(message) = self.in_flight.lock().unwrap().get(&delivery.delivery_tag) {
            self.ready.lock().unwrap().push_back(message.clone());
        }
    }
}

#[async_trait]
impl MessagePublisher for InMemoryBroker {
    async fn publish(
        &self,
        queue: &str,
        content_type: &str,
        payload: &[u8],
    ) -> Result<Uuid, BrokerError> {
        assert_eq!(queue, CART_QUEUE);
        let id = Uuid::new_v4();
        self.ready.lock().unwrap().push_back(QueuedMessage {
            id,
            content_type: content_type.to_string(),
            payload: payload.to_vec(),
            attempts: 0,
            last_error: None,
        });
        Ok(id)
    }
}

#[async_trait]
impl MessageConsumer for InMemoryBroker {
    async fn receive(&self) -> Result<Option<Delivery>, BrokerError> {
        let Some(mut message) = self.ready.lock().unwrap().pop_front() else {
            return Ok(None);
        };
        message.attempts += 1;
        let delivery_tag = Uuid::new_v4();
        let delivery = Delivery {
            message_id: message.id,
            delivery_tag,
            content_type: message.content_type.clone(),
            payload: message.payload.clone(),
            attempts: message.attempts,
        };
        self.in_flight.lock().unwrap().insert(delivery_tag, message);
        Ok(Some(delivery))
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), BrokerError> {
        self.in_flight
            .lock()
            .unwrap()
            .remove(&delivery.delivery_tag)
            .map(|_| ())
            .ok_or(BrokerError::StaleDelivery)
    }

    async fn nack(
        &self,
        delivery: &Delivery,
        requeue: bool,
        reason: &str,
    ) -> Result<(), BrokerError> {
        let mut message = self
            .in_flight
            .lock()
            .unwrap()
            .remove(&delivery.delivery_tag)
            .ok_or(BrokerError::StaleDelivery)?;
        message.last_error = Some(reason.to_string());
        if requeue {
            self.ready.lock().unwrap().push_back(message);
        } else {
            self.dead.lock().unwrap().push(message);
        }
        Ok(())
    }
}

struct InMemoryProducts {
    products: Mutex<HashMap<ProductId, Product>>,
}

impl InMemoryProducts {
    fn with(product: Product) -> Self {
        Self {
            products: Mutex::new(HashMap::from([(product.id, product)])),
        }
    }

    fn set_stock(&self, id: ProductId, stock: i32) {
        if let Some(product) = self.products.lock().unwrap().get_mut(&id) {
            product.stock = stock;
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn get_by_id(&self, id: ProductId) -> Result<Product, RepositoryError> {
        self.products
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

struct InMemoryCartStore {
    products: Arc<InMemoryProducts>,
    rows: Mutex<Vec<CartLineItem>>,
    applied_messages: Mutex<HashSet<Uuid>>,
    fail_next_write: AtomicBool,
    reads: AtomicUsize,
}

impl InMemoryCartStore {
    fn new(products: Arc<InMemoryProducts>) -> Self {
        Self {
            products,
            rows: Mutex::new(Vec::new()),
            applied_messages: Mutex::new(HashSet::new()),
            fail_next_write: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
        }
    }

    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn entry(&self, item: CartLineItem) -> CartEntry {
        let products = self.products.products.lock().unwrap();
        let product = &products[&item.product_id];
        CartEntry {
            product_name: product.name.clone(),
            product_price: product.price,
            item,
        }
    }
}

#[async_trait]
impl CartRepository for InMemoryCartStore {
    async fn create(
        &self,
        item: &NewCartLineItem,
        source_message_id: Option<Uuid>,
    ) -> Result<CreateOutcome, RepositoryError> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseError);
        }
        if let Some(message_id) = source_message_id {
            if !self.applied_messages.lock().unwrap().insert(message_id) {
                return Ok(CreateOutcome::AlreadyApplied);
            }
        }

        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let stored = CartLineItem::from_repository(
            CartItemId::new(rows.len() as u64 + 1),
            item.user_id,
            item.product_id,
            item.quantity,
            now,
            now,
            None,
        );
        rows.push(stored.clone());
        Ok(CreateOutcome::Created(stored))
    }

    async fn was_applied(&self, source_message_id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self
            .applied_messages
            .lock()
            .unwrap()
            .contains(&source_message_id))
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<CartEntry>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap().clone();
        Ok(rows
            .into_iter()
            .filter(|row| row.user_id == user_id && !row.is_deleted())
            .map(|row| self.entry(row))
            .collect())
    }

    async fn get_by_id(
        &self,
        id: CartItemId,
        user_id: UserId,
    ) -> Result<CartEntry, RepositoryError> {
        let rows = self.rows.lock().unwrap().clone();
        rows.into_iter()
            .find(|row| row.id == id && row.user_id == user_id && !row.is_deleted())
            .map(|row| self.entry(row))
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, item: &CartLineItem) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == item.id)
            .ok_or(RepositoryError::NotFound)?;
        *row = item.clone();
        Ok(())
    }

    async fn delete(&self, id: CartItemId, user_id: UserId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id && row.user_id == user_id && !row.is_deleted())
            .ok_or(RepositoryError::NotFound)?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

struct Pipeline {
    broker: Arc<InMemoryBroker>,
    products: Arc<InMemoryProducts>,
    store: Arc<InMemoryCartStore>,
    add_to_cart: AddToCartUseCaseImpl,
    get_cart: GetCartUseCaseImpl,
    worker: CartWorker,
}

fn pipeline(stock: i32) -> Pipeline {
    let logger: Arc<dyn Logger> = Arc::new(SilentLogger);
    let products = Arc::new(InMemoryProducts::with(Product::from_repository(
        ProductId::new(5),
        "Coffee beans".to_string(),
        12.5,
        stock,
    )));
    let broker = Arc::new(InMemoryBroker::default());
    let store = Arc::new(InMemoryCartStore::new(products.clone()));
    let cache = Arc::new(InMemoryCache::default());

    let apply = Arc::new(ApplyCartMutationUseCaseImpl {
        repository: store.clone(),
        product_repository: products.clone(),
        cache: cache.clone(),
        logger: logger.clone(),
        revalidate_stock: true,
    });

    Pipeline {
        add_to_cart: AddToCartUseCaseImpl {
            product_repository: products.clone(),
            publisher: broker.clone(),
            logger: logger.clone(),
            queue: CART_QUEUE.to_string(),
        },
        get_cart: GetCartUseCaseImpl {
            repository: store.clone(),
            cache,
            logger: logger.clone(),
        },
        worker: CartWorker {
            name: "cart-worker-0".to_string(),
            consumer: broker.clone(),
            apply_use_case: apply,
            logger,
            poll_interval: Duration::from_millis(5),
        },
        broker,
        products,
        store,
    }
}

impl Pipeline {
    async fn deliver_next(&self) -> Disposition {
        let delivery = self
            .broker
            .receive()
            .await
            .unwrap()
            .expect("a queued message");
        self.worker.process(delivery).await
    }
}

fn add_params(quantity: i32) -> AddToCartParams {
    AddToCartParams {
        user_id: UserId::new(1),
        product_id: ProductId::new(5),
        quantity,
    }
}

#[tokio::test]
async fn accepted_add_becomes_visible_and_is_then_served_from_cache() {
    let pipeline = pipeline(10);

    let command = pipeline.add_to_cart.execute(add_params(2)).await.unwrap();
    assert_eq!(command.quantity, 2);
    assert_eq!(pipeline.broker.ready_len(), 1);

    assert_eq!(pipeline.deliver_next().await, Disposition::Ack);

    let params = GetCartParams {
        user_id: UserId::new(1),
    };
    let first = pipeline.get_cart.execute(params.clone()).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first.entries[0].item.product_id, ProductId::new(5));
    assert_eq!(first.entries[0].item.quantity, 2);
    assert_eq!(first.entries[0].product_name, "Coffee beans");

    let second = pipeline.get_cart.execute(params).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(pipeline.store.reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn add_beyond_stock_is_refused_without_publishing() {
    let pipeline = pipeline(1);

    let result = pipeline.add_to_cart.execute(add_params(2)).await;

    assert!(matches!(result.unwrap_err(), CartError::InsufficientStock));
    assert_eq!(pipeline.broker.ready_len(), 0);
    assert_eq!(pipeline.store.row_count(), 0);
}

#[tokio::test]
async fn malformed_message_is_dead_lettered_and_store_is_unchanged() {
    let pipeline = pipeline(10);
    pipeline
        .broker
        .publish(CART_QUEUE, JSON_CONTENT_TYPE, b"{not json")
        .await
        .unwrap();

    assert_eq!(pipeline.deliver_next().await, Disposition::Reject);

    assert_eq!(pipeline.store.row_count(), 0);
    assert_eq!(pipeline.broker.ready_len(), 0);
    assert_eq!(
        pipeline.broker.dead_reasons(),
        vec![Some("MALFORMED_MESSAGE".to_string())]
    );
}

#[tokio::test]
async fn failed_write_is_requeued_and_replay_stores_exactly_one_row() {
    let pipeline = pipeline(10);
    pipeline.add_to_cart.execute(add_params(2)).await.unwrap();
    pipeline.store.fail_next_write.store(true, Ordering::SeqCst);

    assert_eq!(pipeline.deliver_next().await, Disposition::Requeue);
    assert_eq!(pipeline.store.row_count(), 0);
    assert_eq!(pipeline.broker.ready_len(), 1);

    assert_eq!(pipeline.deliver_next().await, Disposition::Ack);
    assert_eq!(pipeline.store.row_count(), 1);
    assert_eq!(pipeline.broker.ready_len(), 0);
}

#[tokio::test]
async fn redelivery_after_committed_write_does_not_duplicate_the_row() {
    let pipeline = pipeline(10);
    pipeline.add_to_cart.execute(add_params(2)).await.unwrap();

    let first = pipeline.broker.receive().await.unwrap().unwrap();
    pipeline.broker.expire_lease(&first);
    assert_eq!(pipeline.worker.process(first).await, Disposition::Ack);

    let replay = pipeline.broker.receive().await.unwrap().unwrap();
    assert!(replay.is_redelivery());
    assert_eq!(pipeline.worker.process(replay).await, Disposition::Ack);

    assert_eq!(pipeline.store.row_count(), 1);
}

#[tokio::test]
async fn redelivery_after_committed_write_is_acked_even_if_stock_dropped() {
    let pipeline = pipeline(10);
    pipeline.add_to_cart.execute(add_params(2)).await.unwrap();

    let first = pipeline.broker.receive().await.unwrap().unwrap();
    pipeline.broker.expire_lease(&first);
    assert_eq!(pipeline.worker.process(first).await, Disposition::Ack);

    pipeline.products.set_stock(ProductId::new(5), 0);

    let replay = pipeline.broker.receive().await.unwrap().unwrap();
    assert!(replay.is_redelivery());
    assert_eq!(pipeline.worker.process(replay).await, Disposition::Ack);

    assert_eq!(pipeline.store.row_count(), 1);
    assert_eq!(pipeline.broker.dead_len(), 0);
}

//! Best-effort access to the cart cache. Failures are logged and swallowed: the store
//! is always authoritative and a stale entry is bounded by its TTL.

use crate::domain::cache::Cache;
use crate::domain::cart::snapshot::{CART_CACHE_TTL, CartSnapshot, cart_cache_key};
use crate::domain::logger::Logger;
use crate::domain::shared::value_objects::UserId;

/// Returns the cached cart, or `None` on miss, cache failure or a corrupt value.
pub async fn load_cart(
    cache: &dyn Cache,
    logger: &dyn Logger,
    user_id: UserId,
) -> Option<CartSnapshot> {
    let key = cart_cache_key(user_id);
    match cache.get(&key).await {
        Ok(Some(bytes)) => match CartSnapshot::from_bytes(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                logger.warn(&format!(
                    "Failed to decode cached cart user_id={} error_code=CACHE_UNMARSHAL error={}",
                    user_id, e
                ));
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            logger.warn(&format!(
                "Cart cache read failed user_id={} error_code=CACHE_READ error={}",
                user_id, e
            ));
            None
        }
    }
}

pub async fn store_cart(
    cache: &dyn Cache,
    logger: &dyn Logger,
    user_id: UserId,
    snapshot: &CartSnapshot,
) {
    let bytes = match snapshot.to_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            logger.warn(&format!(
                "Failed to encode cart for cache user_id={} error_code=CACHE_FAILED error={}",
                user_id, e
            ));
            return;
        }
    };

    if let Err(e) = cache
        .set(&cart_cache_key(user_id), &bytes, CART_CACHE_TTL)
        .await
    {
        logger.warn(&format!(
            "Failed to cache cart user_id={} error_code=CACHE_FAILED error={}",
            user_id, e
        ));
    }
}

/// Deletes the user's cached cart. Never refreshes it in place.
pub async fn invalidate_cart(cache: &dyn Cache, logger: &dyn Logger, user_id: UserId) {
    if let Err(e) = cache.delete(&cart_cache_key(user_id)).await {
        logger.warn(&format!(
            "Failed to invalidate cart cache user_id={} error_code=CACHE_INVALIDATE error={}",
            user_id, e
        ));
    }
}

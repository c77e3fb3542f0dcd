//! Handler for the `tradebook delete` command.

use crate::commands::Out;
use crate::{Collection, Result, Store};

/// Deletes one record from a collection by id.
pub async fn delete(store: &Store, collection: Collection, id: i64) -> Result<Out<()>> {
    store.remove(collection, id).await?;
    Ok(Out::new_message(format!(
        "Deleted {collection} record {id}"
    )))
}

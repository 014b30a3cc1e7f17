use bytes::Bytes;
use tracing::info;

use easel_field::FieldClass;
use easel_workflow::{HandleError, WorkflowHandle};

use crate::error::StageError;
use crate::executor::AssetStore;

/// Stage caller-provided bytes behind a resource field.
///
/// Stores the data, then writes the returned asset name into the
/// Resource-variant field at `index`. A wrong-variant index is rejected
/// before anything is uploaded.
pub async fn stage_resource(
  handle: &mut WorkflowHandle,
  index: usize,
  data: Bytes,
  extension_hint: &str,
  store: &dyn AssetStore,
) -> Result<String, StageError> {
  let class = handle.get_field(index)?.class();
  if class != FieldClass::Resource {
    return Err(StageError::Handle(HandleError::VariantMismatch {
      index,
      expected: class,
      got: FieldClass::Resource,
    }));
  }

  let name = store.store(data, extension_hint).await?;
  handle.set_resource(index, Some(name.clone()))?;
  info!(index, name = %name, "staged resource");
  Ok(name)
}

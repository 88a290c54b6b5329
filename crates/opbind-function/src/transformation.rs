use std::fmt;

use opbind_decode::Record;
use opbind_exec::{Administration, Dataset, DatasetId, ExecError, Transformation};

/// An operator's configuration record, able to build its own runnable pair.
///
/// `Clone` must produce storage independent from `self`; plan rewrites
/// rely on it when they duplicate a node.
pub trait TransformationSpec: Record + Clone + fmt::Debug + Send + Sync + 'static {
    fn create_transformation(
        &self,
        id: DatasetId,
        admin: &dyn Administration,
    ) -> Result<(Box<dyn Transformation>, Box<dyn Dataset>), ExecError>;
}

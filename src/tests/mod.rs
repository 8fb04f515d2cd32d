mod account_tests;
mod payment_tests;
mod registry_tests;

use std::path::Path;

use crate::Institute;
use crate::audit::InMemoryAuditSink;

// DEFAULT_COST makes every registration take ~100ms; tests don't need
// slow hashes.
pub(crate) const TEST_BCRYPT_COST: u32 = 4;

pub(crate) async fn open_institute(dir: &Path) -> Institute<InMemoryAuditSink> {
    Institute::open(dir, TEST_BCRYPT_COST, InMemoryAuditSink::new())
        .await
        .unwrap()
}

//! Composite fetchers.
//!
//! A composite anchors on one parent record and bundles the relations fetched
//! for it. Anchor failure fails the composite; relation failures degrade to
//! empty lists independently of one another.

pub mod bill;
pub mod committee;
pub mod member;
pub mod nomination;

pub use bill::{AmendmentRef, CommitteeRef, Cosponsor, FullBill, RelatedBill, fetch_full_bill};
pub use committee::{CommitteeDetail, fetch_committee_detail};
pub use member::{LegislationList, MemberProfile, Sponsorship, fetch_member_legislation};
pub use nomination::{NominationDetail, fetch_nomination_detail};

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run `f` over `inputs` with at most `concurrency` tasks in flight.
///
/// Output keeps input order regardless of completion order. A task that
/// panics is logged and left out.
pub(crate) async fn bounded_map<I, T, F, Fut>(inputs: Vec<I>, concurrency: usize, f: F) -> Vec<T>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut join_set = JoinSet::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let task = f(input);

        join_set.spawn(async move {
            let _permit = permit;
            (index, task.await)
        });
    }

    let mut results: Vec<(usize, T)> = Vec::with_capacity(join_set.len());
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => tracing::error!(error = %e, "fan-out task failed"),
        }
    }

    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, value)| value).collect()
}

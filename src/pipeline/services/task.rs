//! Execution of a single source task.

use crate::pipeline::{
    domain::{TaskDefinition, TaskInput, TaskOutcome},
    ports::SourceTransport,
};

/// Runs one task and returns its outcome.
///
/// Stubs settle with an empty payload without touching the transport.
/// Every other kind performs exactly one transport call; its failure becomes
/// a [`TaskOutcome::Failure`] and never escapes this function. No shared
/// state is read or written.
pub async fn execute_task<T>(
    definition: &TaskDefinition,
    transport: &T,
    input: &TaskInput<'_>,
) -> TaskOutcome
where
    T: SourceTransport + ?Sized,
{
    let Some(request) = definition.request(input) else {
        return TaskOutcome::empty();
    };
    match transport.fetch(&request).await {
        Ok(payload) => TaskOutcome::Success(payload),
        Err(error) => TaskOutcome::Failure(error.into()),
    }
}

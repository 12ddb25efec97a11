use crate::error::AppError;
use crate::mvu::segments::{Deps, Msg, SegmentsModel, update};

/// Runs the MVU loop for the segments model: seeds with `init_msg` and drains effects.
///
/// # Errors
///
/// Returns the first error an effect produced; it is also left on `model.error`.
pub async fn run_segments(
    model: &mut SegmentsModel,
    init_msg: Msg,
    deps: Deps<'_>,
) -> Result<(), AppError> {
    let mut effects = update(model, init_msg);
    while let Some(effect) = effects.pop() {
        let msg = super::segments::run_effect(effect, model, deps).await;
        match msg {
            Msg::Failed(e) => {
                // Record failure and stop the loop.
                update(model, Msg::Failed(e.clone()));
                return Err(e);
            }
            other => {
                let next = update(model, other);
                effects.extend(next);
            }
        }
    }
    Ok(())
}

//! In-page script evaluation

use chromiumoxide::Page;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use serde::de::DeserializeOwned;

use crate::error::BoxError;

/// Evaluate `script` as an expression and deserialize its by-value result.
///
/// Scripts are evaluated as plain expressions (an IIFE for anything with
/// statements) so chromiumoxide never mistakes them for a function
/// declaration.
pub async fn eval_json<T: DeserializeOwned>(page: &Page, script: &str) -> Result<T, BoxError> {
    let params = EvaluateParams::builder()
        .expression(script)
        .return_by_value(true)
        .await_promise(true)
        .build()?;
    let result = page
        .evaluate_expression(params)
        .await
        .map_err(|e| BoxError::from(e.to_string()))?;
    result
        .into_value::<T>()
        .map_err(|e| BoxError::from(e.to_string()))
}

/// Evaluate `script` for its side effects only.
pub async fn eval(page: &Page, script: &str) -> Result<(), BoxError> {
    let params = EvaluateParams::builder().expression(script).build()?;
    page.evaluate_expression(params)
        .await
        .map_err(|e| BoxError::from(e.to_string()))?;
    Ok(())
}

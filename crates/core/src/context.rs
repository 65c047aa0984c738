use crate::catalog::Product;

/// Returns `true` if `text` mentions the product name anywhere, ignoring
/// case. This is a plain substring test: "camera-ready" mentions "Camera",
/// "camcorder" does not.
#[inline]
pub(crate) fn mentions_product(text: &str, product_name: &str) -> bool {
    text.to_lowercase().contains(&product_name.to_lowercase())
}

/// Builds the text that is stored and sent for a user message, prefixing a
/// statement of the selected product when the user didn't name it.
pub(crate) fn with_product_context(
    user_text: &str,
    selected: Option<&Product>,
) -> String {
    match selected {
        Some(product) if !mentions_product(user_text, &product.name) => {
            debug!("injecting context for {}", product.name);
            format!(
                "I would like to order a {} ({}). {user_text}",
                product.name, product.details
            )
        }
        _ => user_text.to_owned(),
    }
}

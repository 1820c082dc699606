mod filter_state;

use proc_macro::TokenStream;

/// Derive macro for `FilterState`.
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Clone, Default, FilterState)]
/// #[filter(key = "projects-filters")]
/// struct ProjectFilters {
///     pub search: String,
///     pub sort_by: String,
///     pub page: u32,
/// }
/// ```
///
/// - `#[filter(key = "...")]` sets the storage slot.
///   If omitted, defaults to the snake_case struct name.
#[proc_macro_derive(FilterState, attributes(filter))]
pub fn derive_filter_state(input: TokenStream) -> TokenStream {
    filter_state::derive_filter_state(input)
}

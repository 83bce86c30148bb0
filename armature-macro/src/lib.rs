use proc_macro::TokenStream;

mod controller;
mod http_methods;
mod injectable;
mod module;

/// Derive macro making a struct constructible out of the DI container.
///
/// Fields typed `Arc<T>` resolve `T`, fields typed `Arc<dyn Trait>` resolve
/// through the trait binding, and `Lazy<T>` fields defer resolution to
/// first access.
///
/// # Example
/// ```ignore
/// #[derive(Injectable)]
/// pub struct NoteService {
///     repository: Arc<dyn NoteRepository>,
/// }
/// ```
#[proc_macro_derive(Injectable)]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}

/// Attribute macro for defining a controller with automatic DI registration.
///
/// # Example
/// ```ignore
/// #[controller(path = "/notes")]
/// pub struct NoteController {
///     service: Arc<NoteService>,
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Attribute macro turning the annotated methods of an impl block into
/// route definitions.
///
/// Every parameter of a route method must carry one of the binding
/// attributes: `#[body]`, `#[param]`, `#[query]`, `#[headers]`,
/// `#[request]`, `#[response]`.
///
/// # Example
/// ```ignore
/// #[routes(NoteController)]
/// impl NoteController {
///     #[get("/{id}")]
///     pub async fn find(&self, #[param] id: Uuid) -> ApiResponse<Note> {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::routes_attribute(attr, item)
}

/// Attribute macro for defining a module with providers and bindings.
///
/// # Example
/// ```ignore
/// #[module(
///     imports = [StorageModule],
///     providers = [NoteService, InMemoryNoteRepository],
///     bindings = [(dyn NoteRepository => InMemoryNoteRepository)],
/// )]
/// pub struct NoteModule;
/// ```
#[proc_macro_attribute]
pub fn module(attr: TokenStream, item: TokenStream) -> TokenStream {
    module::module_attribute(attr, item)
}

/// HTTP GET method attribute for controller methods
#[proc_macro_attribute]
pub fn get(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("GET", attr, item)
}

/// HTTP POST method attribute for controller methods
#[proc_macro_attribute]
pub fn post(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("POST", attr, item)
}

/// HTTP PUT method attribute for controller methods
#[proc_macro_attribute]
pub fn put(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("PUT", attr, item)
}

/// HTTP DELETE method attribute for controller methods
#[proc_macro_attribute]
pub fn delete(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("DELETE", attr, item)
}

/// HTTP PATCH method attribute for controller methods
#[proc_macro_attribute]
pub fn patch(attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::http_method_attribute("PATCH", attr, item)
}

/// Parameter attribute binding the parsed JSON request body.
/// Handled by the `#[routes]` macro; standalone it is a no-op.
#[proc_macro_attribute]
pub fn body(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute binding a path parameter by the parameter's name.
/// Handled by the `#[routes]` macro; standalone it is a no-op.
#[proc_macro_attribute]
pub fn param(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute binding the query-string parameters.
/// Handled by the `#[routes]` macro; standalone it is a no-op.
#[proc_macro_attribute]
pub fn query(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute binding the request header map.
/// Handled by the `#[routes]` macro; standalone it is a no-op.
#[proc_macro_attribute]
pub fn headers(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute binding a snapshot of the request line and headers.
/// Handled by the `#[routes]` macro; standalone it is a no-op.
#[proc_macro_attribute]
pub fn request(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute binding a handle onto the outgoing response head.
/// Handled by the `#[routes]` macro; standalone it is a no-op.
#[proc_macro_attribute]
pub fn response(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

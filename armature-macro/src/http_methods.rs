use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

pub fn http_method_attribute(_method: &str, _attr: TokenStream, item: TokenStream) -> TokenStream {
    // Pass through; the verb and path are read by the #[routes] macro when
    // it walks the impl block.
    let input = parse_macro_input!(item as syn::ImplItemFn);

    TokenStream::from(quote! {
        #input
    })
}

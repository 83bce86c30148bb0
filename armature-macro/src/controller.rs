use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, Attribute, FnArg, ImplItem, ItemImpl,
    ItemStruct, LitStr, Pat, Token, Type,
};

struct ControllerArgs {
    path: String,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path = None;
        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if name == "path" {
                let lit: LitStr = input.parse()?;
                path = Some(lit.value());
            } else {
                let _: syn::Expr = input.parse()?;
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(ControllerArgs {
            path: path.unwrap_or_else(|| "/".to_string()),
        })
    }
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let input = parse_macro_input!(item as ItemStruct);
    let expanded = generate_controller_impl(&args, &input);
    TokenStream::from(expanded)
}

fn generate_controller_impl(args: &ControllerArgs, input: &ItemStruct) -> TokenStream2 {
    let struct_name = &input.ident;
    let base_path = &args.path;
    let injectable_impl = generate_injectable_for_controller(input);
    quote! {
        #input
        #injectable_impl
        impl #struct_name {
            pub const BASE_PATH: &'static str = #base_path;

            pub fn base_path() -> &'static str {
                Self::BASE_PATH
            }
        }
    }
}

fn generate_injectable_for_controller(input: &ItemStruct) -> TokenStream2 {
    let struct_name = &input.ident;
    let body = match &input.fields {
        syn::Fields::Named(fields) => {
            let field_injections = fields.named.iter().map(|field| {
                let field_name = &field.ident;
                if is_wrapper(&field.ty, "Lazy") {
                    return quote! { #field_name: ::armature::di::Lazy::new(container) };
                }
                let field_type = extract_injectable_type(&field.ty);
                match &field_type {
                    Type::TraitObject(_) => quote! {
                        #field_name: container.get_trait::<#field_type>()?
                    },
                    _ => quote! {
                        #field_name: container.get::<#field_type>()?
                    },
                }
            });
            quote! { Ok(Self { #(#field_injections),* }) }
        }
        syn::Fields::Unit => quote! { Ok(Self) },
        syn::Fields::Unnamed(_) => panic!("#[controller] does not support tuple structs"),
    };
    quote! {
        impl ::armature::Injectable for #struct_name {
            fn inject(container: &::armature::Container) -> ::armature::Result<Self> {
                #body
            }
        }
    }
}

fn is_wrapper(ty: &Type, name: &str) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == name;
        }
    }
    false
}

/// Extract the inner type from Arc<T> or Arc<dyn Trait>
fn extract_injectable_type(ty: &Type) -> Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Arc" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                        return inner_type.clone();
                    }
                }
            }
        }
    }
    ty.clone()
}

#[derive(Clone, Copy, PartialEq)]
enum ParamKind {
    Body,
    Param,
    Query,
    Headers,
    Request,
    Response,
}

impl ParamKind {
    fn source_variant(self) -> &'static str {
        match self {
            ParamKind::Body => "Body",
            ParamKind::Param => "PathParams",
            ParamKind::Query => "Query",
            ParamKind::Headers => "Headers",
            ParamKind::Request => "Request",
            ParamKind::Response => "Response",
        }
    }
}

struct ParamInfo {
    name: syn::Ident,
    ty: Type,
    kind: ParamKind,
}

struct RouteInfo {
    method: String,
    path: String,
    fn_name: syn::Ident,
    params: Vec<ParamInfo>,
}

pub fn routes_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    match generate_routes_impl(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn generate_routes_impl(input: ItemImpl) -> syn::Result<TokenStream2> {
    let mut routes: Vec<RouteInfo> = Vec::new();
    let mut clean_items: Vec<ImplItem> = Vec::new();

    for item in input.items.iter() {
        if let ImplItem::Fn(method) = item {
            if let Some(route_info) = extract_route_info(method)? {
                routes.push(route_info);
                let mut clean_method = method.clone();
                clean_method.attrs.retain(|attr| !is_http_method_attr(attr));
                for input in clean_method.sig.inputs.iter_mut() {
                    if let FnArg::Typed(pat_type) = input {
                        pat_type.attrs.retain(|attr| !is_param_attr(attr));
                    }
                }
                clean_items.push(ImplItem::Fn(clean_method));
            } else {
                clean_items.push(item.clone());
            }
        } else {
            clean_items.push(item.clone());
        }
    }

    let route_blocks = routes.iter().map(|route| {
        let method_variant = format_ident!("{}", capitalize(&route.method));
        let path = &route.path;
        let fn_name = &route.fn_name;
        let fn_name_str = fn_name.to_string();
        let arity = route.params.len();

        let bind_calls: Vec<_> = route
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let variant = format_ident!("{}", param.kind.source_variant());
                quote! { .bind(#index, ::armature::routing::ParamSource::#variant) }
            })
            .collect();

        let conversions: Vec<_> = route
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let var = format_ident!("__p_{}", index);
                let ty = &param.ty;
                match param.kind {
                    ParamKind::Body => quote! {
                        let #var: #ty = match ::armature::routing::bound::body(&mut __args, #index) {
                            Ok(value) => value,
                            Err(response) => return response,
                        };
                    },
                    ParamKind::Param => {
                        let name = param.name.to_string();
                        quote! {
                            let #var: #ty = match ::armature::routing::bound::path_param(&mut __args, #index, #name) {
                                Ok(value) => value,
                                Err(response) => return response,
                            };
                        }
                    }
                    ParamKind::Query => quote! {
                        let #var: #ty = match ::armature::routing::bound::query(&mut __args, #index) {
                            Ok(value) => value,
                            Err(response) => return response,
                        };
                    },
                    ParamKind::Headers => quote! {
                        let #var: #ty = match ::armature::routing::bound::headers(&mut __args, #index) {
                            Ok(value) => value,
                            Err(response) => return response,
                        };
                    },
                    ParamKind::Request => quote! {
                        let #var: #ty = match ::armature::routing::bound::request(&mut __args, #index) {
                            Ok(value) => value,
                            Err(response) => return response,
                        };
                    },
                    ParamKind::Response => quote! {
                        let #var: #ty = match ::armature::routing::bound::response(&mut __args, #index) {
                            Ok(value) => value,
                            Err(response) => return response,
                        };
                    },
                }
            })
            .collect();

        let arg_vars: Vec<_> = (0..route.params.len())
            .map(|index| format_ident!("__p_{}", index))
            .collect();

        quote! {
            {
                let controller = ::std::sync::Arc::clone(&this);
                let route = ::armature::routing::Route::new(
                    ::armature::routing::HttpMethod::#method_variant,
                    #path,
                    #fn_name_str,
                    #arity,
                )#(#bind_calls)*;
                let handler: ::armature::routing::DynHandler = ::std::sync::Arc::new(
                    move |mut __args: ::std::vec::Vec<::std::option::Option<::armature::routing::BoundValue>>| {
                        let controller = ::std::sync::Arc::clone(&controller);
                        let fut: ::armature::routing::HandlerFuture = ::std::boxed::Box::pin(async move {
                            use ::armature::axum::response::IntoResponse;
                            let _ = &mut __args;
                            #(#conversions)*
                            controller.#fn_name(#(#arg_vars),*).await.into_response()
                        });
                        fut
                    },
                );
                definitions.push(::armature::routing::RouteDefinition::new(route, handler));
            }
        }
    });

    let self_ty = &input.self_ty;
    let impl_generics = &input.generics;

    Ok(quote! {
        impl #impl_generics #self_ty {
            #(#clean_items)*
        }

        impl #impl_generics ::armature::Controller for #self_ty {
            fn base_path() -> &'static str {
                <Self>::BASE_PATH
            }

            fn routes(
                this: ::std::sync::Arc<Self>,
            ) -> ::std::vec::Vec<::armature::routing::RouteDefinition> {
                let mut definitions = ::std::vec::Vec::new();
                #(#route_blocks)*
                definitions
            }
        }
    })
}

fn extract_route_info(method: &syn::ImplItemFn) -> syn::Result<Option<RouteInfo>> {
    let mut http_method = None;
    let mut path = String::new();

    for attr in &method.attrs {
        if let Some(ident) = attr.path().get_ident() {
            let name = ident.to_string();
            if ["get", "post", "put", "delete", "patch"].contains(&name.as_str()) {
                http_method = Some(name);
                if let syn::Meta::List(meta_list) = &attr.meta {
                    let tokens = meta_list.tokens.to_string();
                    path = tokens.trim_matches('"').to_string();
                }
            }
        }
    }
    let Some(http_method) = http_method else {
        return Ok(None);
    };

    let mut params = Vec::new();
    for input in method.sig.inputs.iter() {
        if let FnArg::Typed(pat_type) = input {
            let Some(kind) = get_param_kind(&pat_type.attrs) else {
                return Err(syn::Error::new_spanned(
                    pat_type,
                    "route parameters must be annotated with one of #[body], #[param], \
                     #[query], #[headers], #[request], #[response]",
                ));
            };
            let name = match pat_type.pat.as_ref() {
                Pat::Ident(pat_ident) => pat_ident.ident.clone(),
                _ if kind == ParamKind::Param => {
                    return Err(syn::Error::new_spanned(
                        pat_type,
                        "#[param] requires a plain identifier pattern; the parameter name \
                         selects the path parameter",
                    ));
                }
                _ => format_ident!("__unnamed"),
            };
            params.push(ParamInfo {
                name,
                ty: (*pat_type.ty).clone(),
                kind,
            });
        }
    }

    Ok(Some(RouteInfo {
        method: http_method,
        path,
        fn_name: method.sig.ident.clone(),
        params,
    }))
}

fn get_param_kind(attrs: &[Attribute]) -> Option<ParamKind> {
    for attr in attrs {
        if let Some(ident) = attr.path().get_ident() {
            match ident.to_string().as_str() {
                "body" => return Some(ParamKind::Body),
                "param" => return Some(ParamKind::Param),
                "query" => return Some(ParamKind::Query),
                "headers" => return Some(ParamKind::Headers),
                "request" => return Some(ParamKind::Request),
                "response" => return Some(ParamKind::Response),
                _ => {}
            }
        }
    }
    None
}

fn capitalize(method: &str) -> String {
    let mut chars = method.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn is_http_method_attr(attr: &Attribute) -> bool {
    attr.path().get_ident().is_some_and(|ident| {
        ["get", "post", "put", "delete", "patch"].contains(&ident.to_string().as_str())
    })
}

fn is_param_attr(attr: &Attribute) -> bool {
    attr.path().get_ident().is_some_and(|ident| {
        ["body", "param", "query", "headers", "request", "response"]
            .contains(&ident.to_string().as_str())
    })
}

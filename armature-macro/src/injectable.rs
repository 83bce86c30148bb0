use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = generate_injectable_impl(&input);
    TokenStream::from(expanded)
}

fn generate_injectable_impl(input: &DeriveInput) -> TokenStream2 {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                let field_injections = fields.named.iter().map(field_injection);
                quote! { Ok(Self { #(#field_injections),* }) }
            }
            Fields::Unit => quote! { Ok(Self) },
            Fields::Unnamed(_) => {
                panic!("#[derive(Injectable)] does not support tuple structs")
            }
        },
        _ => panic!("#[derive(Injectable)] can only be applied to structs"),
    };

    quote! {
        impl #impl_generics ::armature::Injectable for #struct_name #ty_generics #where_clause {
            fn inject(
                container: &::armature::Container
            ) -> ::armature::Result<Self> {
                #body
            }
        }
    }
}

fn field_injection(field: &syn::Field) -> TokenStream2 {
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

    // If not Arc<T>, return as-is
    ty.clone()
}

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derives the `VtyNode` trait for application node enums.
///
/// Each unit variant becomes a VTY node whose numeric identifier is the
/// variant's discriminant offset past the range reserved for the library's
/// canonical nodes (`NodeId::APP_BASE`). The node name is the variant name in
/// kebab-case.
///
/// # Example
///
/// ```ignore
/// use nut_vty_macros::VtyNode;
///
/// #[derive(Debug, Copy, Clone, PartialEq, Eq, VtyNode)]
/// pub enum BscNode {
///     Network = 0,
///     Bts = 1,
///     BtsTrx = 2,
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl VtyNode for BscNode {
///     fn node_id(self) -> NodeId {
///         NodeId::app(self as u32)
///     }
///
///     fn from_node_id(id: NodeId) -> Option<Self> {
///         if id == NodeId::app(Self::Network as u32) {
///             return Some(Self::Network);
///         }
///         // ...
///         None
///     }
///
///     fn name(self) -> &'static str {
///         match self {
///             Self::Network => "network",
///             Self::Bts => "bts",
///             Self::BtsTrx => "bts-trx",
///         }
///     }
/// }
///
/// impl From<BscNode> for NodeId { /* ... */ }
/// ```
///
/// # Requirements
///
/// - The type must be an enum and must be `Copy`
/// - All variants must be unit variants (no fields)
#[proc_macro_derive(VtyNode)]
pub fn derive_vty_node(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data_enum) => &data_enum.variants,
        _ => {
            return syn::Error::new_spanned(&input, "VtyNode can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    if variants.is_empty() {
        return syn::Error::new_spanned(&input, "VtyNode requires at least one variant")
            .to_compile_error()
            .into();
    }

    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(
                variant,
                "VtyNode can only be derived for enums with unit variants (no fields)",
            )
            .to_compile_error()
            .into();
        }
    }

    let from_id_checks = variants.iter().map(|variant| {
        let variant_name = &variant.ident;
        quote! {
            if id == ::nut_vty::tree::NodeId::app(Self::#variant_name as u32) {
                return ::core::option::Option::Some(Self::#variant_name);
            }
        }
    });

    let name_arms = variants.iter().map(|variant| {
        let variant_name = &variant.ident;
        let node_name = kebab_case(&variant_name.to_string());
        quote! {
            Self::#variant_name => #node_name
        }
    });

    let expanded = quote! {
        impl ::nut_vty::tree::VtyNode for #name {
            fn node_id(self) -> ::nut_vty::tree::NodeId {
                ::nut_vty::tree::NodeId::app(self as u32)
            }

            fn from_node_id(id: ::nut_vty::tree::NodeId) -> ::core::option::Option<Self> {
                #(#from_id_checks)*
                ::core::option::Option::None
            }

            fn name(self) -> &'static str {
                match self {
                    #(#name_arms,)*
                }
            }
        }

        impl ::core::convert::From<#name> for ::nut_vty::tree::NodeId {
            fn from(node: #name) -> Self {
                <#name as ::nut_vty::tree::VtyNode>::node_id(node)
            }
        }
    };

    TokenStream::from(expanded)
}

/// `BtsTrx` -> `bts-trx`
fn kebab_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

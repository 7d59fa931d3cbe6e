extern crate proc_macro;
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput};

/// Derives `Display` and `std::error::Error` for a type implementing
/// `UserError`. The rendered message is
/// `Error <code>: <user message>\n\tCaused by:\n\t<technical message>`, or
/// `Error <code>: <technical message>` when there is no user message.
#[proc_macro_derive(UserErrorDisplay)]
pub fn user_error_display_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    match &ast.data {
        Data::Enum(_) | Data::Struct(_) => {}
        Data::Union(_) => {
            return syn::Error::new_spanned(
                &ast.ident,
                "UserErrorDisplay can only be derived for enums and structs",
            )
            .to_compile_error()
            .into();
        }
    }

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let expanded = quote! {
        impl #impl_generics std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.user_message() {
                    Some(user_message) => write!(
                        f,
                        "Error {}: {}\n\tCaused by:\n\t{}",
                        self.code(),
                        user_message,
                        self.technical_message()
                    ),
                    None => write!(f, "Error {}: {}", self.code(), self.technical_message()),
                }
            }
        }

        impl #impl_generics std::error::Error for #name #ty_generics #where_clause {}
    };
    TokenStream::from(expanded)
}

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Attribute, Expr,
    ImplItem, ImplItemFn, ItemImpl, Token,
};

const HANDLER_ATTRIBUTE: &str = "exception_handler";

struct AdviceArgs {
    exception: syn::Type,
}

impl Parse for AdviceArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut exception = None;
        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if name == "exception" {
                exception = Some(input.parse::<syn::Type>()?);
            } else {
                return Err(syn::Error::new(
                    name.span(),
                    format!("unknown #[controller_advice] argument `{}`", name),
                ));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        match exception {
            Some(exception) => Ok(AdviceArgs { exception }),
            None => Err(input.error("#[controller_advice] requires `exception = <Type>`")),
        }
    }
}

struct HandlerInfo {
    fn_name: syn::Ident,
    kinds: Vec<Expr>,
    has_receiver: bool,
}

pub fn controller_advice_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as AdviceArgs);
    let input = parse_macro_input!(item as ItemImpl);
    match generate_advice_impl(&args, input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

pub fn exception_handler_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    TokenStream::from(reject_stray_handler(TokenStream2::from(item)))
}

fn reject_stray_handler(item: TokenStream2) -> TokenStream2 {
    let err = syn::Error::new_spanned(
        &item,
        "#[exception_handler] must be used on a method inside a #[controller_advice] impl block",
    )
    .to_compile_error();
    quote! {
        #err
        #item
    }
}

fn generate_advice_impl(args: &AdviceArgs, mut input: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[controller_advice] must be placed on an inherent impl block",
        ));
    }

    let mut handlers = Vec::new();
    for item in input.items.iter_mut() {
        if let ImplItem::Fn(method) = item {
            if let Some(info) = extract_handler_info(method)? {
                handlers.push(info);
            }
        }
    }

    let self_ty = &input.self_ty;
    let exception = &args.exception;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let registrations = handlers.iter().map(|handler| {
        let fn_name = &handler.fn_name;
        let name = fn_name.to_string();
        let kinds = &handler.kinds;
        let callable = if handler.has_receiver {
            quote! {{
                let advice = ::std::sync::Arc::clone(&self);
                move |exception: &#exception| {
                    ::advisor::exception::IntoHandlerResult::into_handler_result(
                        advice.#fn_name(exception),
                    )
                }
            }}
        } else {
            quote! {
                |exception: &#exception| {
                    ::advisor::exception::IntoHandlerResult::into_handler_result(
                        <#self_ty>::#fn_name(exception),
                    )
                }
            }
        };
        quote! {
            .handler(#name, [#(#kinds),*], #callable)
        }
    });

    Ok(quote! {
        #input

        impl #impl_generics #self_ty #where_clause {
            /// Collect the `#[exception_handler]` methods of this advice, in declaration order
            pub fn handler_registry(
                self: ::std::sync::Arc<Self>,
            ) -> ::advisor::Result<::advisor::exception::HandlerRegistry<#exception>> {
                ::advisor::exception::HandlerRegistry::<#exception>::builder()
                    #(#registrations)*
                    .build()
            }

            /// Build a dispatcher over [`Self::handler_registry`]
            pub fn dispatcher(
                self: ::std::sync::Arc<Self>,
            ) -> ::advisor::Result<::advisor::exception::Dispatcher<#exception>> {
                Ok(::advisor::exception::Dispatcher::new(self.handler_registry()?))
            }
        }
    })
}

fn extract_handler_info(method: &mut ImplItemFn) -> syn::Result<Option<HandlerInfo>> {
    let Some(position) = method.attrs.iter().position(is_handler_attribute) else {
        return Ok(None);
    };
    let attr = method.attrs.remove(position);

    if method.attrs.iter().any(is_handler_attribute) {
        return Err(syn::Error::new_spanned(
            &method.sig.ident,
            "a method may carry only one #[exception_handler]; list every kind in it",
        ));
    }
    if method.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            method.sig.asyncness,
            "exception handlers must be synchronous",
        ));
    }
    if let Some(receiver) = method.sig.receiver() {
        if receiver.reference.is_none() || receiver.mutability.is_some() {
            return Err(syn::Error::new_spanned(
                receiver,
                "exception handlers take `&self`; the advice is shared behind an `Arc`",
            ));
        }
    }
    if method.sig.inputs.len() != if method.sig.receiver().is_some() { 2 } else { 1 } {
        return Err(syn::Error::new_spanned(
            &method.sig.inputs,
            "exception handlers take exactly one argument: the raised exception",
        ));
    }

    let kinds = parse_kinds(&attr)?;
    if kinds.is_empty() {
        return Err(syn::Error::new_spanned(
            attr.to_token_stream(),
            "#[exception_handler] needs at least one exception kind",
        ));
    }

    Ok(Some(HandlerInfo {
        fn_name: method.sig.ident.clone(),
        kinds,
        has_receiver: method.sig.receiver().is_some(),
    }))
}

fn is_handler_attribute(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .map(|segment| segment.ident == HANDLER_ATTRIBUTE)
        .unwrap_or(false)
}

fn parse_kinds(attr: &Attribute) -> syn::Result<Vec<Expr>> {
    match &attr.meta {
        syn::Meta::Path(_) => Ok(Vec::new()),
        _ => {
            let kinds =
                attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
            Ok(kinds.into_iter().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(args: &str, item: &str) -> syn::Result<TokenStream2> {
        let args: AdviceArgs = syn::parse_str(args)?;
        let input: ItemImpl = syn::parse_str(item)?;
        generate_advice_impl(&args, input)
    }

    fn expect_error(item: &str, message: &str) {
        let err = expand("exception = AppException", item).unwrap_err();
        assert!(
            err.to_string().contains(message),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_expands_handlers_in_declaration_order() {
        let expanded = expand(
            "exception = AppException",
            r#"
            impl Advice {
                #[exception_handler(Kind::BadRequest)]
                fn handle_bad_request(&self, e: &AppException) -> AdviceResponse { todo!() }

                #[exception_handler(Kind::NotFound, Kind::Gone)]
                fn handle_missing(e: &AppException) -> AdviceResponse { todo!() }
            }
            "#,
        )
        .unwrap()
        .to_string();

        let first = expanded.find("\"handle_bad_request\"").unwrap();
        let second = expanded.find("\"handle_missing\"").unwrap();
        assert!(first < second);
        assert!(expanded.contains("fn handler_registry"));
        assert!(expanded.contains("fn dispatcher"));
        assert!(!expanded.contains("# [exception_handler"));
    }

    #[test]
    fn test_empty_kind_list_is_rejected() {
        expect_error(
            r#"
            impl Advice {
                #[exception_handler()]
                fn handle(&self, e: &AppException) -> AdviceResponse { todo!() }
            }
            "#,
            "needs at least one exception kind",
        );
        expect_error(
            r#"
            impl Advice {
                #[exception_handler]
                fn handle(&self, e: &AppException) -> AdviceResponse { todo!() }
            }
            "#,
            "needs at least one exception kind",
        );
    }

    #[test]
    fn test_by_value_receivers_are_rejected() {
        for receiver in ["self", "mut self", "self: Arc<Self>", "&mut self"] {
            let item = format!(
                "impl Advice {{ #[exception_handler(Kind::NotFound)] fn handle({receiver}, e: &AppException) -> AdviceResponse {{ todo!() }} }}"
            );
            expect_error(&item, "exception handlers take `&self`");
        }
    }

    #[test]
    fn test_async_handler_is_rejected() {
        expect_error(
            r#"
            impl Advice {
                #[exception_handler(Kind::NotFound)]
                async fn handle(&self, e: &AppException) -> AdviceResponse { todo!() }
            }
            "#,
            "must be synchronous",
        );
    }

    #[test]
    fn test_trait_impl_is_rejected() {
        expect_error(
            "impl Handler for Advice {}",
            "must be placed on an inherent impl block",
        );
    }

    #[test]
    fn test_missing_exception_argument_is_rejected() {
        assert!(syn::parse_str::<AdviceArgs>("").is_err());
        assert!(syn::parse_str::<AdviceArgs>("error = AppException").is_err());
    }

    #[test]
    fn test_stray_handler_attribute_emits_compile_error() {
        let item: TokenStream2 = syn::parse_str("fn handle(e: &AppException) {}").unwrap();
        let expanded = reject_stray_handler(item).to_string();
        assert!(expanded.contains("compile_error"));
        assert!(expanded.contains("inside a #[controller_advice] impl block"));
        assert!(expanded.contains("fn handle"));
    }
}

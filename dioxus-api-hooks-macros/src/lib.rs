use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use std::time::Duration;
use syn::{
    FnArg, ItemFn, LitStr, Pat, PatType, Result, ReturnType, Token, Type, parse::Parse,
    parse::ParseStream, parse_macro_input,
};

/// Attribute arguments for the operation macro
#[derive(Default)]
struct OperationArgs {
    requires_auth: bool,
    timeout: Option<Duration>,
    name: Option<LitStr>,
}

impl Parse for OperationArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = OperationArgs::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;

            match ident.to_string().as_str() {
                "requires_auth" => {
                    args.requires_auth = true;
                }
                "timeout" => {
                    input.parse::<Token![=]>()?;
                    let lit: LitStr = input.parse()?;
                    let duration = humantime::parse_duration(&lit.value()).map_err(|e| {
                        syn::Error::new_spanned(&lit, format!("Invalid duration format: {e}"))
                    })?;
                    args.timeout = Some(duration);
                }
                "name" => {
                    input.parse::<Token![=]>()?;
                    args.name = Some(input.parse()?);
                }
                _ => return Err(syn::Error::new_spanned(ident, "Unknown argument")),
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// Operation macro for declaring async operations used by the hooks
///
/// This macro converts an `async fn` returning `Result<T, E>` into a unit
/// struct implementing `dioxus_api_hooks::operation::Operation`, plus a
/// constructor function with the original name.
///
/// The parameter type follows the function signature:
/// - no parameters: `Operation<()>`
/// - one parameter: `Operation<ParamType>`
/// - several parameters: `Operation<(Param1, Param2, ...)>`
///
/// # Supported Arguments
/// - `requires_auth` - Never run without an authenticated session
/// - `timeout = "10s"` - Deadline enforced by the operation itself. The error
///   type must implement `From<OperationTimeout>`.
/// - `name = "label"` - Label used in logs and auth errors (defaults to the function name)
///
/// # Examples
/// ```rust,ignore
/// #[operation]
/// async fn fetch_scene(id: u32) -> Result<Scene, ApiError> {
///     // Implementation
/// }
///
/// #[operation(requires_auth, timeout = "5s")]
/// async fn save_preferences(user_id: u32, prefs: Preferences) -> Result<(), ApiError> {
///     // Implementation
/// }
///
/// // Usage: fetch_scene() returns the operation value
/// let scene = use_api_call(fetch_scene(), CallOptions::new());
/// ```
#[proc_macro_attribute]
pub fn operation(args: TokenStream, input: TokenStream) -> TokenStream {
    let operation_args = if args.is_empty() {
        OperationArgs::default()
    } else {
        match syn::parse(args) {
            Ok(args) => args,
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let input_fn = parse_macro_input!(input as ItemFn);

    match generate_operation(input_fn, operation_args) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_operation(input_fn: ItemFn, args: OperationArgs) -> Result<TokenStream2> {
    if input_fn.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &input_fn.sig.fn_token,
            "#[operation] can only be applied to async functions",
        ));
    }

    let info = extract_operation_info(&input_fn)?;
    let OperationInfo {
        fn_vis,
        fn_block,
        output_type,
        error_type,
        struct_name,
        fn_name,
        ..
    } = &info;

    let params = extract_all_params(&input_fn)?;
    let param_names: Vec<_> = params.iter().map(|p| &p.name).collect();
    let param_types: Vec<_> = params.iter().map(|p| &p.ty).collect();
    let input_type = build_input_type(&params);

    let label = match &args.name {
        Some(lit) => lit.value(),
        None => fn_name.to_string(),
    };

    // Destructure the single run() argument into the original parameter names
    let (run_arg, bind_params) = match params.len() {
        0 => (quote! { _param }, quote! {}),
        1 => {
            let name = param_names[0];
            (quote! { #name }, quote! {})
        }
        _ => (
            quote! { params },
            quote! { let (#(#param_names,)*) = params; },
        ),
    };

    let call = quote! { Self::call(#(#param_names,)*) };
    let run_body = match args.timeout {
        Some(timeout) => {
            let millis = timeout.as_millis() as u64;
            quote! {
                ::dioxus_api_hooks::operation::with_timeout(
                    #label,
                    ::std::time::Duration::from_millis(#millis),
                    #call,
                )
            }
        }
        None => call,
    };

    let requires_auth_impl = if args.requires_auth {
        quote! {
            fn requires_auth(&self) -> bool {
                true
            }
        }
    } else {
        quote! {}
    };

    let common_struct = generate_common_struct(&info);

    Ok(quote! {
        #common_struct

        impl #struct_name {
            #fn_vis async fn call(#(#param_names: #param_types,)*) -> Result<#output_type, #error_type> {
                #fn_block
            }
        }

        impl ::dioxus_api_hooks::operation::Operation<#input_type> for #struct_name {
            type Output = #output_type;
            type Error = #error_type;

            fn run(&self, #run_arg: #input_type) -> impl ::std::future::Future<Output = Result<Self::Output, Self::Error>> + Send {
                #bind_params
                #run_body
            }

            #requires_auth_impl

            fn name(&self) -> &'static str {
                #label
            }
        }
    })
}

struct OperationInfo {
    fn_vis: syn::Visibility,
    fn_attrs: Vec<syn::Attribute>,
    fn_block: Box<syn::Block>,
    output_type: Type,
    error_type: Type,
    struct_name: syn::Ident,
    fn_name: syn::Ident,
}

/// Information about a function parameter
struct ParamInfo {
    name: syn::Ident,
    ty: Type,
}

fn extract_operation_info(input_fn: &ItemFn) -> Result<OperationInfo> {
    let fn_name = input_fn.sig.ident.clone();
    let (output_type, error_type) = extract_result_types(&input_fn.sig.output)?;
    let struct_name = syn::Ident::new(&to_pascal_case(&fn_name.to_string()), fn_name.span());

    Ok(OperationInfo {
        fn_vis: input_fn.vis.clone(),
        fn_attrs: input_fn.attrs.clone(),
        fn_block: input_fn.block.clone(),
        output_type,
        error_type,
        struct_name,
        fn_name,
    })
}

/// The unit struct plus a constructor function carrying the original name
fn generate_common_struct(info: &OperationInfo) -> TokenStream2 {
    let OperationInfo {
        fn_vis,
        fn_attrs,
        struct_name,
        fn_name,
        ..
    } = info;

    quote! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        #(#fn_attrs)*
        #fn_vis struct #struct_name;

        #fn_vis fn #fn_name() -> #struct_name {
            #struct_name
        }
    }
}

fn extract_all_params(input_fn: &ItemFn) -> Result<Vec<ParamInfo>> {
    input_fn
        .sig
        .inputs
        .iter()
        .map(|input| match input {
            FnArg::Typed(PatType { pat, ty, .. }) => match &**pat {
                Pat::Ident(pat_ident) => Ok(ParamInfo {
                    name: pat_ident.ident.clone(),
                    ty: (**ty).clone(),
                }),
                _ => Err(syn::Error::new_spanned(
                    pat,
                    "Only simple parameter names are supported",
                )),
            },
            FnArg::Receiver(_) => Err(syn::Error::new_spanned(
                input,
                "Methods with self parameter are not supported",
            )),
        })
        .collect()
}

/// Build the input type: () for 0 params, T for 1 param, (T1, T2, ...) for N params
fn build_input_type(params: &[ParamInfo]) -> TokenStream2 {
    match params {
        [] => quote! { () },
        [single] => {
            let ty = &single.ty;
            quote! { #ty }
        }
        _ => {
            let types: Vec<_> = params.iter().map(|p| &p.ty).collect();
            quote! { (#(#types,)*) }
        }
    }
}

/// Extract `T` and `E` from a `Result<T, E>` return type
fn extract_result_types(return_type: &ReturnType) -> Result<(Type, Type)> {
    let error = || {
        syn::Error::new_spanned(
            return_type,
            "Operation functions must return Result<T, E>",
        )
    };

    let ReturnType::Type(_, ty) = return_type else {
        return Err(error());
    };
    let Type::Path(type_path) = &**ty else {
        return Err(error());
    };
    let Some(segment) = type_path.path.segments.last() else {
        return Err(error());
    };
    if segment.ident != "Result" {
        return Err(error());
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return Err(error());
    };

    let mut types = args.args.iter().filter_map(|arg| match arg {
        syn::GenericArgument::Type(ty) => Some(ty.clone()),
        _ => None,
    });
    match (types.next(), types.next(), types.next()) {
        (Some(output_type), Some(error_type), None) => Ok((output_type, error_type)),
        _ => Err(syn::Error::new_spanned(
            args,
            "Result must have exactly two type arguments",
        )),
    }
}

/// Convert a string to PascalCase
fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

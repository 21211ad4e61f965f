use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named))]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

impl ModelFieldReceiver {
	/// Whether the field is filled in by the server, i.e. it carries
	/// `#[serde(skip_deserializing)]` or `#[serde(skip)]`.
	fn is_server_side(&self) -> bool {
		self.attrs.iter().any(|attr| {
			let Meta::List(ref list) = attr.meta else {
				return false;
			};

			list.path.is_ident("serde")
				&& list.tokens.to_token_stream().into_iter().any(|token| {
					matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
				})
		})
	}

	/// Attributes that still make sense on an input struct.
	fn input_attrs(&self) -> impl Iterator<Item = &syn::Attribute> {
		self.attrs.iter().filter(|attr| {
			let path = attr.path();

			path.is_ident("doc")
				|| path.is_ident("serde")
				|| path.is_ident("validate")
				|| path.is_ident("schemars")
		})
	}
}

/// Removes `#[validate]` from the fields of the model itself. Only the
/// generated inputs are validated, so the model does not derive `Validate`.
fn strip_validate_attrs(input: &mut syn::DeriveInput) {
	if let syn::Data::Struct(ref mut data) = input.data {
		for field in &mut data.fields {
			field.attrs.retain(|attr| !attr.path().is_ident("validate"));
		}
	}
}

pub fn from_input(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let mut input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	strip_validate_attrs(&mut input);

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}Input", ident);
	let update_ident = format_ident!("Update{}Input", ident);
	let create_doc = format!("Fields accepted when creating a [`{ident}`].");
	let update_doc =
		format!("Fields accepted when updating a [`{ident}`]. Omitted fields are left unchanged.");

	let Some(fields) = receiver.data.take_struct() else {
		return syn::Error::new(ident.span(), "#[model] only supports structs with named fields")
			.into_compile_error()
			.into();
	};

	let fields = fields
		.iter()
		.filter(|field| !field.is_server_side())
		.filter_map(|field| {
			let attrs = field.input_attrs().collect::<Vec<_>>();

			Some((attrs, field.ident.as_ref()?, &field.ty, &field.vis))
		})
		.collect::<Vec<_>>();

	let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#[serde(default)]
			#vis #ident: ::std::option::Option<#ty>,
		}
	});

	quote! {
		#input

		#[doc = #create_doc]
		#[derive(::std::fmt::Debug, ::serde::Deserialize, ::schemars::JsonSchema, ::validator::Validate)]
		#vis struct #create_ident #generics {
			#(
				#create_fields
			)*
		}

		#[doc = #update_doc]
		#[derive(::std::fmt::Debug, ::std::default::Default, ::serde::Deserialize, ::schemars::JsonSchema, ::validator::Validate)]
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
	.into()
}

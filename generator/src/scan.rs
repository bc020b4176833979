//! Declaration feed over a crate's `src/` tree
//!
//! Every `.rs` file is parsed with `syn`. Its module path is derived from the
//! file location (`src/hos/services/acc/mod.rs` -> `crate::hos::services::acc`)
//! and inline `mod` blocks are followed. The walk is sorted so the feed order,
//! and therefore the generated artifact, is stable across runs.
//!
//! What counts as a constructor: an associated function of an inherent,
//! non-generic `impl` block that has no receiver, is visible from the module
//! of the enclosing type, is neither `async` nor `unsafe` nor generic, and
//! returns `Self` (or the type by name).
//!
//! Visibility is always judged from the module that will hold the generated
//! function: a private sibling module of it is reachable, a private module
//! further away is not.

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, Result};
use crate::marker::{collect_markers, ServiceMarker};
use crate::model::{CandidateType, Constructor, ParamType, Passing, TypePath};
use crate::resolve::{Import, SymbolTable, UsePath};
use quote::ToTokens;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{
    Attribute, FnArg, Generics, ImplItem, ItemEnum, ItemFn, ItemImpl, ItemMod, ItemStruct,
    ItemTrait, ItemType, ItemUnion, ItemUse, Meta, ReturnType, Token, Type, UseTree, Visibility,
};
use walkdir::WalkDir;

/// Candidates in feed order plus the symbols needed to resolve their types
#[derive(Debug, Clone)]
pub struct DeclarationFeed {
    pub candidates: Vec<CandidateType>,
    pub symbols: SymbolTable,
}

#[derive(Debug)]
struct DeclaredType {
    path: TypePath,
    /// Module the type is visible within
    visibility: TypePath,
    is_abstract: bool,
    markers: Vec<ServiceMarker>,
}

#[derive(Debug)]
struct ImplBlock {
    scope: TypePath,
    self_ty: Type,
    constructors: Vec<Constructor>,
}

/// Accumulates parsed files into a [`DeclarationFeed`]
pub struct FeedBuilder {
    marker_prefix: String,
    /// Module of the enclosing type, where the generated code lives
    dispatcher: TypePath,
    symbols: SymbolTable,
    types: Vec<DeclaredType>,
    impls: Vec<ImplBlock>,
}

impl FeedBuilder {
    pub fn new(config: &GeneratorConfig) -> Self {
        let mut symbols = SymbolTable::new();
        for name in &config.extern_crates {
            symbols.add_extern_crate(name.clone());
        }
        Self {
            marker_prefix: config.marker_prefix.clone(),
            dispatcher: config.enclosing_type.parent().unwrap_or_else(TypePath::root),
            symbols,
            types: Vec::new(),
            impls: Vec::new(),
        }
    }

    /// Parse `source` as the contents of `module`.
    pub fn add_source(&mut self, module: TypePath, source: &str) -> syn::Result<()> {
        let file = syn::parse_file(source)?;
        self.add_file(module, &file);
        Ok(())
    }

    pub fn add_file(&mut self, module: TypePath, file: &syn::File) {
        let mut ancestor = module.parent();
        while let Some(path) = ancestor {
            ancestor = path.parent();
            self.symbols.declare_module(path, TypePath::root());
        }
        self.symbols.declare_module(module.clone(), TypePath::root());

        let mut visitor = DeclarationVisitor {
            marker_prefix: &self.marker_prefix,
            dispatcher: &self.dispatcher,
            modules: vec![module],
            symbols: &mut self.symbols,
            types: &mut self.types,
            impls: &mut self.impls,
        };
        visitor.visit_file(file);
    }

    /// Attach constructors to their types and produce the feed.
    pub fn finish(self) -> DeclarationFeed {
        let FeedBuilder {
            dispatcher,
            symbols,
            types,
            impls,
            ..
        } = self;

        let mut candidates: Vec<CandidateType> = types
            .into_iter()
            .map(|declared| CandidateType {
                is_private: !symbols.is_reachable(
                    &declared.path,
                    &declared.visibility,
                    &dispatcher,
                ),
                name: declared.path,
                is_abstract: declared.is_abstract,
                markers: declared.markers,
                constructors: Vec::new(),
            })
            .collect();

        let mut by_path: HashMap<TypePath, Vec<usize>> = HashMap::new();
        for (index, candidate) in candidates.iter().enumerate() {
            by_path.entry(candidate.name.clone()).or_default().push(index);
        }

        for block in impls {
            let Some(target) = symbols.resolve_item(&block.scope, &block.self_ty) else {
                tracing::debug!(
                    scope = %block.scope,
                    self_ty = %block.self_ty.to_token_stream(),
                    "skipping impl block with unresolved self type"
                );
                continue;
            };
            if let Some(indices) = by_path.get(&target) {
                for &index in indices {
                    candidates[index]
                        .constructors
                        .extend(block.constructors.iter().cloned());
                }
            }
        }

        DeclarationFeed {
            candidates,
            symbols,
        }
    }
}

/// Scan every Rust file below `src_dir`.
///
/// Unreadable or unparsable files abort the scan: skipping them could
/// silently drop services from the table.
pub fn scan_crate(src_dir: &Path, config: &GeneratorConfig) -> Result<DeclarationFeed> {
    if !src_dir.is_dir() {
        return Err(GenerateError::MissingSource(src_dir.to_path_buf()));
    }
    let has_lib = src_dir.join("lib.rs").is_file();
    let mut builder = FeedBuilder::new(config);
    let mut files = 0usize;

    for entry in WalkDir::new(src_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "rs").unwrap_or(false))
    {
        let path = entry.path();
        if has_lib && path == src_dir.join("main.rs") {
            continue;
        }
        let Some(module) = module_path_for(src_dir, path) else {
            continue;
        };

        let content = fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file = syn::parse_file(&content).map_err(|e| GenerateError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        builder.add_file(module, &file);
        files += 1;
    }

    tracing::debug!(files, src = %src_dir.display(), "scanned sources");
    Ok(builder.finish())
}

/// Module path of a source file
/// e.g., "src/hos/services/acc/mod.rs" -> "crate::hos::services::acc"
///
/// Returns `None` for files outside `src_dir`, under `src/bin`, or whose
/// path is not made of valid identifiers.
pub fn module_path_for(src_dir: &Path, file: &Path) -> Option<TypePath> {
    let relative = file.strip_prefix(src_dir).ok()?;
    let mut parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_str().map(String::from))
        .collect::<Option<_>>()?;

    let file_name = parts.pop()?;
    let stem = file_name.strip_suffix(".rs")?;
    if parts.first().map(|p| p == "bin").unwrap_or(false) {
        return None;
    }

    match (parts.is_empty(), stem) {
        (true, "lib") | (true, "main") => {}
        (_, "mod") => {}
        _ => parts.push(stem.to_string()),
    }

    if !parts.iter().all(|p| is_identifier(p)) {
        return None;
    }

    let mut path = TypePath::root();
    for part in &parts {
        path = path.join(part);
    }
    Some(path)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Describe one parameter type as written inside `scope`.
pub fn param_type(ty: &Type, scope: &TypePath) -> ParamType {
    let (passing, target) = match ty {
        Type::Reference(reference) if reference.mutability.is_some() => {
            (Passing::Mutable, &*reference.elem)
        }
        Type::Reference(reference) => (Passing::Shared, &*reference.elem),
        other => (Passing::Value, other),
    };

    ParamType {
        written: ty.to_token_stream().to_string(),
        target: target.to_token_stream().to_string(),
        passing,
        scope: scope.clone(),
    }
}

/// Module within which an item declared in `module` with `vis` is visible
fn visibility_scope(vis: &Visibility, module: &TypePath) -> TypePath {
    match vis {
        Visibility::Public(_) => TypePath::root(),
        Visibility::Inherited => module.clone(),
        Visibility::Restricted(restricted) => {
            let mut segments = restricted.path.segments.iter().map(|s| s.ident.to_string());
            let mut scope = match segments.next().as_deref() {
                Some("self") => module.clone(),
                Some("super") => module.parent().unwrap_or_else(TypePath::root),
                _ => TypePath::root(),
            };
            for segment in segments {
                scope = if segment == "super" {
                    scope.parent().unwrap_or_else(TypePath::root)
                } else {
                    scope.join(&segment)
                };
            }
            scope
        }
    }
}

/// True for `#[cfg(...)]` predicates that only hold under `test`
fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<Meta>()
                .map(|meta| requires_test(&meta))
                .unwrap_or(false)
    })
}

fn requires_test(meta: &Meta) -> bool {
    match meta {
        Meta::Path(path) => path.is_ident("test"),
        Meta::List(list) => {
            let Ok(nested) = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            else {
                return false;
            };
            if list.path.is_ident("all") {
                nested.iter().any(requires_test)
            } else if list.path.is_ident("any") {
                !nested.is_empty() && nested.iter().all(requires_test)
            } else {
                false
            }
        }
        Meta::NameValue(_) => false,
    }
}

fn has_generics(generics: &Generics) -> bool {
    !generics.params.is_empty()
}

/// Visitor that collects declarations, impl blocks, imports and modules
struct DeclarationVisitor<'a> {
    marker_prefix: &'a str,
    dispatcher: &'a TypePath,
    modules: Vec<TypePath>,
    symbols: &'a mut SymbolTable,
    types: &'a mut Vec<DeclaredType>,
    impls: &'a mut Vec<ImplBlock>,
}

impl DeclarationVisitor<'_> {
    fn current(&self) -> TypePath {
        self.modules.last().cloned().unwrap_or_else(TypePath::root)
    }

    fn declare_type(
        &mut self,
        ident: &syn::Ident,
        vis: &Visibility,
        generics: &Generics,
        attrs: &[Attribute],
    ) {
        let module = self.current();
        let path = module.join(&ident.to_string());
        self.symbols.declare_item(path.clone());
        self.types.push(DeclaredType {
            path,
            visibility: visibility_scope(vis, &module),
            is_abstract: has_generics(generics),
            markers: collect_markers(attrs, self.marker_prefix),
        });
    }

    fn constructor(&self, self_terminal: &str, item: &syn::ImplItemFn) -> Option<Constructor> {
        let sig = &item.sig;
        let scope = self.current();
        if !self.dispatcher.is_under(&visibility_scope(&item.vis, &scope))
            || is_cfg_test(&item.attrs)
            || sig.asyncness.is_some()
            || sig.unsafety.is_some()
            || sig.receiver().is_some()
            || has_generics(&sig.generics)
        {
            return None;
        }

        let returns_self = match &sig.output {
            ReturnType::Type(_, ty) => match &**ty {
                Type::Path(type_path) if type_path.qself.is_none() => type_path
                    .path
                    .segments
                    .last()
                    .map(|s| {
                        s.arguments.is_empty() && (s.ident == "Self" || s.ident == self_terminal)
                    })
                    .unwrap_or(false),
                _ => false,
            },
            ReturnType::Default => false,
        };
        if !returns_self {
            return None;
        }

        let params = sig
            .inputs
            .iter()
            .filter_map(|arg| match arg {
                FnArg::Typed(pat_type) => Some(param_type(&pat_type.ty, &scope)),
                FnArg::Receiver(_) => None,
            })
            .collect();

        Some(Constructor {
            name: sig.ident.to_string(),
            params,
        })
    }

    fn flatten_use(&mut self, tree: &UseTree, prefix: &mut Vec<String>, leading_colon: bool) {
        let module = self.current();
        match tree {
            UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.flatten_use(&path.tree, prefix, leading_colon);
                prefix.pop();
            }
            UseTree::Name(name) => {
                let ident = name.ident.to_string();
                let (alias, segments) = if ident == "self" {
                    let Some(last) = prefix.last() else { return };
                    (last.clone(), prefix.clone())
                } else {
                    let mut segments = prefix.clone();
                    segments.push(ident.clone());
                    (ident, segments)
                };
                self.symbols.add_import(
                    module,
                    Import::Named {
                        alias,
                        path: UsePath::new(leading_colon, segments),
                    },
                );
            }
            UseTree::Rename(rename) => {
                let alias = rename.rename.to_string();
                if alias == "_" {
                    return;
                }
                let mut segments = prefix.clone();
                if rename.ident != "self" {
                    segments.push(rename.ident.to_string());
                }
                self.symbols.add_import(
                    module,
                    Import::Named {
                        alias,
                        path: UsePath::new(leading_colon, segments),
                    },
                );
            }
            UseTree::Glob(_) => {
                self.symbols.add_import(
                    module,
                    Import::Glob {
                        path: UsePath::new(leading_colon, prefix.clone()),
                    },
                );
            }
            UseTree::Group(group) => {
                for item in &group.items {
                    self.flatten_use(item, prefix, leading_colon);
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for DeclarationVisitor<'_> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        if is_cfg_test(&node.attrs) {
            return;
        }
        let module = self.current();
        let path = module.join(&node.ident.to_string());
        self.symbols
            .declare_module(path.clone(), visibility_scope(&node.vis, &module));

        if node.content.is_some() {
            self.modules.push(path);
            syn::visit::visit_item_mod(self, node);
            self.modules.pop();
        }
    }

    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        if !is_cfg_test(&node.attrs) {
            self.declare_type(&node.ident, &node.vis, &node.generics, &node.attrs);
        }
    }

    fn visit_item_enum(&mut self, node: &'ast ItemEnum) {
        if !is_cfg_test(&node.attrs) {
            self.declare_type(&node.ident, &node.vis, &node.generics, &node.attrs);
        }
    }

    fn visit_item_union(&mut self, node: &'ast ItemUnion) {
        let path = self.current().join(&node.ident.to_string());
        self.symbols.declare_item(path);
    }

    fn visit_item_type(&mut self, node: &'ast ItemType) {
        let path = self.current().join(&node.ident.to_string());
        self.symbols.declare_item(path);
    }

    fn visit_item_trait(&mut self, node: &'ast ItemTrait) {
        let path = self.current().join(&node.ident.to_string());
        self.symbols.declare_item(path);
    }

    fn visit_item_use(&mut self, node: &'ast ItemUse) {
        if is_cfg_test(&node.attrs) {
            return;
        }
        let mut prefix = Vec::new();
        self.flatten_use(&node.tree, &mut prefix, node.leading_colon.is_some());
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        if node.trait_.is_some() || has_generics(&node.generics) || is_cfg_test(&node.attrs) {
            return;
        }
        let self_terminal = match &*node.self_ty {
            Type::Path(type_path) => type_path
                .path
                .segments
                .last()
                .map(|s| s.ident.to_string())
                .unwrap_or_default(),
            _ => return,
        };

        let constructors: Vec<Constructor> = node
            .items
            .iter()
            .filter_map(|item| match item {
                ImplItem::Fn(function) => self.constructor(&self_terminal, function),
                _ => None,
            })
            .collect();

        self.impls.push(ImplBlock {
            scope: self.current(),
            self_ty: (*node.self_ty).clone(),
            constructors,
        });
    }

    // Items inside function bodies are not nameable from the crate
    fn visit_item_fn(&mut self, _node: &'ast ItemFn) {}
}

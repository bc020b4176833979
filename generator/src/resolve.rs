//! Semantic type lookup over the scanned crate
//!
//! The [`SymbolTable`] knows every module, every declared type and every `use`
//! item of the crate. It turns a type as written inside some module into a
//! path that is valid from anywhere in the crate (`crate::...` for local items,
//! `::std::...` for external ones). Names it cannot account for are an error:
//! the generator never guesses a path.

use crate::error::ResolveError;
use crate::model::{ParamType, TypePath};
use quote::ToTokens;
use std::collections::{BTreeMap, BTreeSet};
use syn::{GenericArgument, PathArguments, Type};

/// Nested lookups (re-exports of re-exports) give up past this depth.
const MAX_LOOKUP_DEPTH: usize = 16;

const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32",
    "i64", "i128", "isize", "f32", "f64",
];

const PRELUDE: &[(&str, &str)] = &[
    ("String", "::std::string::String"),
    ("Vec", "::std::vec::Vec"),
    ("Option", "::std::option::Option"),
    ("Result", "::std::result::Result"),
    ("Box", "::std::boxed::Box"),
];

/// Resolves constructor parameter types to fully qualified form
pub trait TypeResolver {
    fn resolve(&self, param: &ParamType) -> Result<String, ResolveError>;
}

/// A path from a `use` item, kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsePath {
    pub leading_colon: bool,
    pub segments: Vec<String>,
}

impl UsePath {
    pub fn new(leading_colon: bool, segments: Vec<String>) -> Self {
        Self {
            leading_colon,
            segments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Import {
    /// `use a::b::C;` or `use a::b::C as D;`
    Named { alias: String, path: UsePath },
    /// `use a::b::*;`
    Glob { path: UsePath },
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    items: BTreeSet<TypePath>,
    /// Module path -> module its visibility extends over
    modules: BTreeMap<TypePath, TypePath>,
    imports: BTreeMap<TypePath, Vec<Import>>,
    extern_crates: BTreeSet<String>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut modules = BTreeMap::new();
        modules.insert(TypePath::root(), TypePath::root());
        Self {
            items: BTreeSet::new(),
            modules,
            imports: BTreeMap::new(),
            extern_crates: ["std", "core", "alloc"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    pub fn add_extern_crate(&mut self, name: impl Into<String>) {
        self.extern_crates.insert(name.into());
    }

    pub fn declare_item(&mut self, path: TypePath) {
        self.items.insert(path);
    }

    /// Record a module visible within `visibility`. A module seen twice (a
    /// `mod` declaration and its file) keeps the narrower visibility.
    pub fn declare_module(&mut self, path: TypePath, visibility: TypePath) {
        let entry = self.modules.entry(path).or_insert_with(TypePath::root);
        if visibility.depth() > entry.depth() {
            *entry = visibility;
        }
    }

    pub fn add_import(&mut self, module: TypePath, import: Import) {
        self.imports.entry(module).or_default().push(import);
    }

    /// True when code in module `from` can name `item` by its full path.
    ///
    /// `visibility` is the module the item itself is visible within. Every
    /// module on the path must be visible from `from` as well.
    pub fn is_reachable(&self, item: &TypePath, visibility: &TypePath, from: &TypePath) -> bool {
        if !from.is_under(visibility) {
            return false;
        }
        let mut current = item.parent();
        while let Some(module) = current {
            if let Some(scope) = self.modules.get(&module) {
                if !from.is_under(scope) {
                    return false;
                }
            }
            current = module.parent();
        }
        true
    }

    /// Resolve the self type of an `impl` block to a declared crate item.
    pub fn resolve_item(&self, scope: &TypePath, ty: &Type) -> Option<TypePath> {
        let Type::Path(type_path) = ty else {
            return None;
        };
        if type_path.qself.is_some() {
            return None;
        }
        let names: Vec<String> = type_path
            .path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();
        let path = self
            .resolve_names(scope, type_path.path.leading_colon.is_some(), &names)
            .ok()?;
        self.items.contains(&path).then_some(path)
    }

    /// Render `ty`, written inside `scope`, as a crate-wide valid type.
    pub fn resolve_type(&self, scope: &TypePath, ty: &Type) -> Result<String, ResolveError> {
        match ty {
            Type::Path(type_path) => {
                if type_path.qself.is_some() {
                    return Err(unsupported(ty));
                }
                let path = &type_path.path;
                let count = path.segments.len();
                let mut names = Vec::with_capacity(count);
                for (i, segment) in path.segments.iter().enumerate() {
                    if i + 1 < count && !segment.arguments.is_empty() {
                        return Err(unsupported(ty));
                    }
                    names.push(segment.ident.to_string());
                }

                let base = self.resolve_names(scope, path.leading_colon.is_some(), &names)?;
                if base.is_crate_local() && !self.items.contains(&base) {
                    return Err(ResolveError::Unsupported(format!("{} is not a type", base)));
                }

                let arguments = match path.segments.last().map(|s| &s.arguments) {
                    Some(PathArguments::AngleBracketed(args)) => {
                        let rendered = args
                            .args
                            .iter()
                            .map(|arg| self.resolve_argument(scope, arg, ty))
                            .collect::<Result<Vec<_>, _>>()?;
                        format!("<{}>", rendered.join(", "))
                    }
                    Some(PathArguments::Parenthesized(_)) => return Err(unsupported(ty)),
                    _ => String::new(),
                };
                Ok(format!("{}{}", base, arguments))
            }
            Type::Tuple(tuple) => {
                let elems = tuple
                    .elems
                    .iter()
                    .map(|elem| self.resolve_type(scope, elem))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(match elems.len() {
                    1 => format!("({},)", elems[0]),
                    _ => format!("({})", elems.join(", ")),
                })
            }
            Type::Array(array) => Ok(format!(
                "[{}; {}]",
                self.resolve_type(scope, &array.elem)?,
                array.len.to_token_stream()
            )),
            Type::Slice(slice) => Ok(format!("[{}]", self.resolve_type(scope, &slice.elem)?)),
            Type::Reference(reference) => {
                let lifetime = match &reference.lifetime {
                    Some(lt) if lt.ident == "static" => "'static ",
                    Some(_) => return Err(ResolveError::Lifetime(ty.to_token_stream().to_string())),
                    None => return Err(unsupported(ty)),
                };
                let mutability = if reference.mutability.is_some() {
                    "mut "
                } else {
                    ""
                };
                Ok(format!(
                    "&{}{}{}",
                    lifetime,
                    mutability,
                    self.resolve_type(scope, &reference.elem)?
                ))
            }
            Type::Paren(paren) => self.resolve_type(scope, &paren.elem),
            Type::Group(group) => self.resolve_type(scope, &group.elem),
            _ => Err(unsupported(ty)),
        }
    }

    fn resolve_argument(
        &self,
        scope: &TypePath,
        arg: &GenericArgument,
        whole: &Type,
    ) -> Result<String, ResolveError> {
        match arg {
            GenericArgument::Type(inner) => self.resolve_type(scope, inner),
            GenericArgument::Lifetime(lt) if lt.ident == "static" => Ok("'static".to_string()),
            GenericArgument::Lifetime(_) => Err(ResolveError::Lifetime(
                whole.to_token_stream().to_string(),
            )),
            GenericArgument::Const(expr) => Ok(expr.to_token_stream().to_string()),
            _ => Err(unsupported(whole)),
        }
    }

    /// Resolve a plain path (no generics) as used in type position.
    fn resolve_names(
        &self,
        scope: &TypePath,
        leading_colon: bool,
        names: &[String],
    ) -> Result<TypePath, ResolveError> {
        let Some((first, rest)) = names.split_first() else {
            return Err(ResolveError::Syntax(String::new()));
        };

        if leading_colon {
            return Ok(external(names));
        }

        let base = match first.as_str() {
            "crate" => TypePath::root(),
            "self" => scope.clone(),
            "super" => {
                let mut base = scope.parent().ok_or(ResolveError::SuperOutOfRoot)?;
                let mut rest = rest;
                while let Some(("super", tail)) = rest.split_first().map(|(h, t)| (h.as_str(), t)) {
                    base = base.parent().ok_or(ResolveError::SuperOutOfRoot)?;
                    rest = tail;
                }
                return self.descend(base, rest);
            }
            name => match self.lookup(scope, name, 0) {
                Some(found) => found,
                None if rest.is_empty() && PRIMITIVES.contains(&name) => {
                    return Ok(TypePath::new(name));
                }
                None if rest.is_empty() => {
                    return PRELUDE
                        .iter()
                        .find(|(short, _)| *short == name)
                        .map(|(_, full)| TypePath::new(*full))
                        .ok_or_else(|| ResolveError::UnknownName(name.to_string()));
                }
                None if self.extern_crates.contains(name) => return Ok(external(names)),
                None => return Err(ResolveError::UnknownName(name.to_string())),
            },
        };
        self.descend(base, rest)
    }

    fn descend(&self, base: TypePath, rest: &[String]) -> Result<TypePath, ResolveError> {
        let mut current = base;
        for segment in rest {
            current = if current.is_crate_local() {
                self.lookup(&current, segment, 0)
                    .ok_or_else(|| ResolveError::UnknownMember {
                        module: current.clone(),
                        segment: segment.clone(),
                    })?
            } else {
                current.join(segment)
            };
        }
        Ok(current)
    }

    /// Find what `name` refers to inside `module`: a declared item or child
    /// module, a named import, or a member of a glob import.
    fn lookup(&self, module: &TypePath, name: &str, depth: usize) -> Option<TypePath> {
        if depth > MAX_LOOKUP_DEPTH {
            return None;
        }

        let direct = module.join(name);
        if self.items.contains(&direct) || self.modules.contains_key(&direct) {
            return Some(direct);
        }

        let imports = self.imports.get(module)?;
        for import in imports {
            if let Import::Named { alias, path } = import {
                if alias == name {
                    return self.resolve_use(module, path, depth + 1);
                }
            }
        }
        imports.iter().find_map(|import| match import {
            Import::Glob { path } => {
                let target = self.resolve_use(module, path, depth + 1)?;
                if target.is_crate_local() {
                    self.lookup(&target, name, depth + 1)
                } else {
                    None
                }
            }
            Import::Named { .. } => None,
        })
    }

    /// Resolve a `use` path written inside `module`. Paths rooted in an
    /// unknown name are taken as external crates: the compiler already
    /// accepted the `use` item.
    fn resolve_use(&self, module: &TypePath, path: &UsePath, depth: usize) -> Option<TypePath> {
        if path.leading_colon {
            return Some(external(&path.segments));
        }
        let (first, rest) = path.segments.split_first()?;
        let mut base = match first.as_str() {
            "crate" => TypePath::root(),
            "self" => module.clone(),
            "super" => module.parent()?,
            name => match self.lookup(module, name, depth + 1) {
                Some(found) => found,
                None => return Some(external(&path.segments)),
            },
        };

        let mut rest = rest;
        while let Some((head, tail)) = rest.split_first() {
            if head == "super" {
                base = base.parent()?;
                rest = tail;
            } else {
                break;
            }
        }

        for segment in rest {
            base = if base.is_crate_local() {
                self.lookup(&base, segment, depth + 1)?
            } else {
                base.join(segment)
            };
        }
        Some(base)
    }
}

impl TypeResolver for SymbolTable {
    fn resolve(&self, param: &ParamType) -> Result<String, ResolveError> {
        let ty: Type = syn::parse_str(&param.target)
            .map_err(|_| ResolveError::Syntax(param.target.clone()))?;
        self.resolve_type(&param.scope, &ty)
    }
}

fn external(segments: &[String]) -> TypePath {
    TypePath::new(format!("::{}", segments.join("::")))
}

fn unsupported(ty: &Type) -> ResolveError {
    ResolveError::Unsupported(ty.to_token_stream().to_string())
}

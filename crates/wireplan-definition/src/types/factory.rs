//! Memoizing construction of [`Type`] handles.

use std::collections::HashMap;

use wireplan_common::error::{Result, WireplanError};

use super::{DeclaredType, Type, TypeIntersect, TypeUnion, lexer, parser};

/// Scalar and pseudo types, created once per factory.
#[derive(Debug)]
struct ScalarTypes {
    int: Type,
    string: Type,
    bool: Type,
    float: Type,
    array: Type,
    mixed: Type,
    void: Type,
    never: Type,
    null: Type,
    object: Type,
    self_: Type,
    static_: Type,
}

impl ScalarTypes {
    fn new() -> Self {
        Self {
            int: Type::new("int"),
            string: Type::new("string"),
            bool: Type::new("bool"),
            float: Type::new("float"),
            array: Type::new("array"),
            mixed: Type::new("mixed"),
            void: Type::new("void"),
            never: Type::new("never"),
            null: Type::new("null"),
            object: Type::new("object"),
            self_: Type::new("self"),
            static_: Type::new("static"),
        }
    }

    fn lookup(&self, keyword: &str) -> Option<&Type> {
        let ty = match keyword.to_ascii_lowercase().as_str() {
            "int" => &self.int,
            "string" => &self.string,
            "bool" => &self.bool,
            "float" => &self.float,
            "array" => &self.array,
            "mixed" => &self.mixed,
            "void" => &self.void,
            "never" => &self.never,
            "null" => &self.null,
            "object" => &self.object,
            "self" => &self.self_,
            "static" => &self.static_,
            _ => return None,
        };
        Some(ty)
    }
}

/// Owns the memoization table for [`Type`] handles.
///
/// Scalar types are singletons per factory and class types are interned
/// per name, so handles returned for the same name satisfy
/// [`Type::ptr_eq`]. Unions and intersections are fresh values on every
/// call and compare structurally.
#[derive(Debug)]
pub struct TypeFactory {
    scalars: ScalarTypes,
    classes: HashMap<String, Type>,
}

impl TypeFactory {
    /// Creates a factory with its scalar singletons.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scalars: ScalarTypes::new(),
            classes: HashMap::new(),
        }
    }

    /// The `int` type.
    #[must_use]
    pub fn int(&self) -> Type {
        self.scalars.int.clone()
    }

    /// The `string` type.
    #[must_use]
    pub fn string(&self) -> Type {
        self.scalars.string.clone()
    }

    /// The `bool` type.
    #[must_use]
    pub fn bool(&self) -> Type {
        self.scalars.bool.clone()
    }

    /// The `float` type.
    #[must_use]
    pub fn float(&self) -> Type {
        self.scalars.float.clone()
    }

    /// The `array` type.
    #[must_use]
    pub fn array(&self) -> Type {
        self.scalars.array.clone()
    }

    /// The `mixed` type.
    #[must_use]
    pub fn mixed(&self) -> Type {
        self.scalars.mixed.clone()
    }

    /// The `void` type.
    #[must_use]
    pub fn void(&self) -> Type {
        self.scalars.void.clone()
    }

    /// The `never` type.
    #[must_use]
    pub fn never(&self) -> Type {
        self.scalars.never.clone()
    }

    /// The `null` type.
    #[must_use]
    pub fn null(&self) -> Type {
        self.scalars.null.clone()
    }

    /// The `object` type.
    #[must_use]
    pub fn object(&self) -> Type {
        self.scalars.object.clone()
    }

    /// The `self` type.
    #[must_use]
    pub fn self_type(&self) -> Type {
        self.scalars.self_.clone()
    }

    /// The `static` type.
    #[must_use]
    pub fn static_type(&self) -> Type {
        self.scalars.static_.clone()
    }

    /// Returns the type for `name`, interning class names.
    ///
    /// Scalar keywords are matched case-insensitively and map to their
    /// singleton. A leading namespace separator is stripped from class names.
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` if the name is empty.
    pub fn class(&mut self, name: &str) -> Result<Type> {
        let name = name.trim().trim_start_matches('\\');
        if name.is_empty() {
            return Err(WireplanError::InvalidType {
                message: "type name must not be empty".into(),
            });
        }
        if let Some(scalar) = self.scalars.lookup(name) {
            return Ok(scalar.clone());
        }
        let ty = self
            .classes
            .entry(name.to_owned())
            .or_insert_with(|| Type::new(name));
        Ok(ty.clone())
    }

    /// Builds a union of at least two members.
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` for fewer than two members.
    pub fn union(&self, members: Vec<DeclaredType>) -> Result<TypeUnion> {
        check_member_count("union", &members)?;
        Ok(TypeUnion::new(members))
    }

    /// Builds an intersection of at least two members.
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` for fewer than two members.
    pub fn intersect(&self, members: Vec<DeclaredType>) -> Result<TypeIntersect> {
        check_member_count("intersection", &members)?;
        Ok(TypeIntersect::new(members))
    }

    /// Builds `ty|null`.
    #[must_use]
    pub fn nullable(&self, ty: Type) -> TypeUnion {
        TypeUnion::new(vec![DeclaredType::Single(ty), DeclaredType::Single(self.null())])
    }

    /// Builds the declared type of a parameter from its annotation text.
    ///
    /// Absent or blank annotations default to `mixed`; `?T` becomes `T|null`.
    /// Unions, intersections, and parenthesized groups such as `(A&B)|null`
    /// are supported.
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` if the annotation is malformed.
    pub fn from_declaration(&mut self, declaration: Option<&str>) -> Result<DeclaredType> {
        let Some(text) = declaration.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(DeclaredType::Single(self.mixed()));
        };
        tracing::trace!(declaration = text, "parsing type declaration");
        let tokens = lexer::tokenize(text)?;
        parser::parse(&tokens, self)
    }
}

impl Default for TypeFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn check_member_count(kind: &str, members: &[DeclaredType]) -> Result<()> {
    if members.len() < 2 {
        return Err(WireplanError::InvalidType {
            message: format!(
                "a type {kind} requires at least 2 members, got {}",
                members.len()
            ),
        });
    }
    Ok(())
}

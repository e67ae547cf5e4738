//! Selector: which derived value to read from a map, and its structural
//! validation.

use core::fmt;
use thiserror::Error;

/// Rejected selector: the member expression is not a single, direct
/// property reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expression '{selector}' must refer to a property")]
pub struct MalformedSelectorError {
    /// Text of the rejected expression.
    pub selector: String,
}

/// The five dispatch outcomes of a validated selector.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SelectorKind {
    Count,
    IsEmpty,
    Keys,
    Values,
    Other,
}

impl SelectorKind {
    /// Map a member name to its outcome. Exact, case-sensitive match; every
    /// name that is not one of the four recognized ones is `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Count" => SelectorKind::Count,
            "IsEmpty" => SelectorKind::IsEmpty,
            "Keys" => SelectorKind::Keys,
            "Values" => SelectorKind::Values,
            _ => SelectorKind::Other,
        }
    }

    /// True for the four outcomes served by lazy enumeration.
    pub fn is_enumerated(self) -> bool {
        !matches!(self, SelectorKind::Other)
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectorKind::Count => "Count",
            SelectorKind::IsEmpty => "IsEmpty",
            SelectorKind::Keys => "Keys",
            SelectorKind::Values => "Values",
            SelectorKind::Other => "Other",
        })
    }
}

/// Uninhabited result type for selectors that never take the direct
/// evaluation path.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NoMember {}

/// A named member of the map together with the read-only accessor that
/// evaluates it directly.
///
/// The expression text decides the dispatch: `m => m.Count` is served by
/// lazy enumeration even though an accessor is supplied, while
/// `m => m.capacity` calls the accessor.
pub struct Member<'f, M: ?Sized, T> {
    expr: &'f str,
    read: Box<dyn Fn(&M) -> T + 'f>,
}

impl<'f, M: ?Sized, T> Member<'f, M, T> {
    pub fn new<F>(expr: &'f str, read: F) -> Self
    where
        F: Fn(&M) -> T + 'f,
    {
        Self {
            expr,
            read: Box::new(read),
        }
    }

    pub fn expr(&self) -> &'f str {
        self.expr
    }

    /// Name of the referenced member, or an error if `expr` is not a
    /// direct member reference.
    pub fn name(&self) -> Result<&'f str, MalformedSelectorError> {
        member_name(self.expr).ok_or_else(|| MalformedSelectorError {
            selector: self.expr().to_string(),
        })
    }

    /// Evaluate the member directly against `map`.
    pub(crate) fn read(&self, map: &M) -> T {
        (self.read)(map)
    }
}

impl<'f, M: ?Sized, T> fmt::Debug for Member<'f, M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member").field("expr", &self.expr).finish()
    }
}

/// Which derived value to produce from a map of type `M`.
///
/// Build the recognized selectors with [`Selector::count`],
/// [`Selector::is_empty`], [`Selector::keys`] and [`Selector::values`];
/// arbitrary reads go through [`Selector::member`].
pub enum Selector<'f, M: ?Sized, T> {
    Count,
    IsEmpty,
    Keys,
    Values,
    Member(Member<'f, M, T>),
}

impl<'f, M: ?Sized, T> fmt::Debug for Selector<'f, M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Count => f.write_str("Count"),
            Selector::IsEmpty => f.write_str("IsEmpty"),
            Selector::Keys => f.write_str("Keys"),
            Selector::Values => f.write_str("Values"),
            Selector::Member(m) => f.debug_tuple("Member").field(m).finish(),
        }
    }
}

impl<'f, M: ?Sized> Selector<'f, M, NoMember> {
    pub fn count() -> Self {
        Selector::Count
    }

    pub fn is_empty() -> Self {
        Selector::IsEmpty
    }

    pub fn keys() -> Self {
        Selector::Keys
    }

    pub fn values() -> Self {
        Selector::Values
    }
}

impl<'f, M: ?Sized, T> Selector<'f, M, T> {
    /// Selector for the member named by `expr`, evaluated with `read` when
    /// the name is not one of the recognized aggregates.
    pub fn member<F>(expr: &'f str, read: F) -> Self
    where
        F: Fn(&M) -> T + 'f,
    {
        Selector::Member(Member::new(expr, read))
    }

    /// Validate the selector and decide its dispatch outcome. Pure: never
    /// touches a map.
    pub fn kind(&self) -> Result<SelectorKind, MalformedSelectorError> {
        self.dispatch().map(|d| d.kind())
    }

    pub(crate) fn dispatch(&self) -> Result<Dispatch<'_, 'f, M, T>, MalformedSelectorError> {
        let member = match self {
            Selector::Count => return Ok(Dispatch::Count),
            Selector::IsEmpty => return Ok(Dispatch::IsEmpty),
            Selector::Keys => return Ok(Dispatch::Keys),
            Selector::Values => return Ok(Dispatch::Values),
            Selector::Member(m) => m,
        };
        Ok(match SelectorKind::from_name(member.name()?) {
            SelectorKind::Count => Dispatch::Count,
            SelectorKind::IsEmpty => Dispatch::IsEmpty,
            SelectorKind::Keys => Dispatch::Keys,
            SelectorKind::Values => Dispatch::Values,
            SelectorKind::Other => Dispatch::Other(member),
        })
    }
}

/// Validated selector; `Other` keeps the accessor to evaluate.
pub(crate) enum Dispatch<'s, 'f, M: ?Sized, T> {
    Count,
    IsEmpty,
    Keys,
    Values,
    Other(&'s Member<'f, M, T>),
}

impl<'s, 'f, M: ?Sized, T> Dispatch<'s, 'f, M, T> {
    pub(crate) fn kind(&self) -> SelectorKind {
        match self {
            Dispatch::Count => SelectorKind::Count,
            Dispatch::IsEmpty => SelectorKind::IsEmpty,
            Dispatch::Keys => SelectorKind::Keys,
            Dispatch::Values => SelectorKind::Values,
            Dispatch::Other(_) => SelectorKind::Other,
        }
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

// `<...>` generics, `[]` arrays and `.`/`::` paths; commas only inside `<>`.
fn is_type(s: &str) -> bool {
    if !s.starts_with(|c: char| c == '_' || c.is_alphabetic()) {
        return false;
    }
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            ',' if depth == 0 => return false,
            ',' | '.' | ':' | '[' | ']' | ' ' => {}
            c if c == '_' || c.is_alphanumeric() => {}
            _ => return false,
        }
    }
    depth == 0
}

/// Remove one pair of parentheses if it encloses all of `s`.
fn strip_parens(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('(')?.strip_suffix(')')?;
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0).then(|| inner.trim())
}

/// Lambda parameter list: `m`, `(m)` or `(Type m)`; returns the name.
fn param_name(p: &str) -> Option<&str> {
    let p = strip_parens(p).unwrap_or(p);
    match p.rsplit_once(char::is_whitespace) {
        Some((ty, name)) => (is_type(ty.trim()) && is_ident(name)).then_some(name),
        None => is_ident(p).then_some(p),
    }
}

/// Extract the member name from `[param =>] [receiver .] name`.
///
/// The parameter may be parenthesized and typed, and the body may carry
/// redundant parentheses. When a parameter is declared the receiver must
/// be that parameter. Calls, operators, indexing and chained member
/// access are rejected.
pub(crate) fn member_name(expr: &str) -> Option<&str> {
    let (param, body) = match expr.split_once("=>") {
        Some((p, b)) => (Some(param_name(p.trim())?), b.trim()),
        None => (None, expr.trim()),
    };
    let mut body = body;
    while let Some(inner) = strip_parens(body) {
        body = inner;
    }
    let name = match body.split_once('.') {
        Some((recv, name)) => {
            let recv = recv.trim();
            if !is_ident(recv) || param.is_some_and(|p| p != recv) {
                return None;
            }
            name.trim()
        }
        // A lambda must reach the member through its parameter.
        None if param.is_some() => return None,
        None => body,
    };
    is_ident(name).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_names_dispatch() {
        assert_eq!(SelectorKind::from_name("Count"), SelectorKind::Count);
        assert_eq!(SelectorKind::from_name("IsEmpty"), SelectorKind::IsEmpty);
        assert_eq!(SelectorKind::from_name("Keys"), SelectorKind::Keys);
        assert_eq!(SelectorKind::from_name("Values"), SelectorKind::Values);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(SelectorKind::from_name("count"), SelectorKind::Other);
        assert_eq!(SelectorKind::from_name("KEYS"), SelectorKind::Other);
        assert_eq!(SelectorKind::from_name("Len"), SelectorKind::Other);
    }

    #[test]
    fn member_name_accepts_direct_references() {
        assert_eq!(member_name("Count"), Some("Count"));
        assert_eq!(member_name("m.Keys"), Some("Keys"));
        assert_eq!(member_name("  m => m.Values "), Some("Values"));
        assert_eq!(member_name("x=>x . capacity"), Some("capacity"));
        assert_eq!(member_name("(m) => m.Count"), Some("Count"));
        assert_eq!(member_name("(Map m) => m.Count"), Some("Count"));
        assert_eq!(member_name("( DashMap<u32, u32> m ) => m.Keys"), Some("Keys"));
        assert_eq!(member_name("m => (m.Count)"), Some("Count"));
        assert_eq!(member_name("(m) => ((m.IsEmpty))"), Some("IsEmpty"));
    }

    #[test]
    fn member_name_rejects_everything_else() {
        for bad in [
            "",
            "m => m.Count()",
            "m.Count()",
            "Count()",
            "m => m.Keys.Count",
            "m => n.Count",
            "m => Count",
            "m => m.len() + 1",
            "m[0]",
            "1Count",
            "m => ",
            "=> m.Count",
            "m => m?.Count",
            "(a, b) => a.Count",
            "(Map m => m.Count",
            "m => (m.Count",
            "m => (m).Count()",
            "(m) (m) => m.Count",
            "(Map<u32 m) => m.Count",
        ] {
            assert_eq!(member_name(bad), None, "accepted {:?}", bad);
        }
    }

    #[test]
    fn member_kind_follows_its_name() {
        let s: Selector<'_, Vec<u8>, usize> = Selector::member("v => v.Count", |v: &Vec<u8>| v.len());
        assert_eq!(s.kind(), Ok(SelectorKind::Count));

        let s: Selector<'_, Vec<u8>, usize> = Selector::member("v => v.capacity", |v: &Vec<u8>| v.capacity());
        assert_eq!(s.kind(), Ok(SelectorKind::Other));
    }

    #[test]
    fn malformed_member_reports_text() {
        let s: Selector<'_, Vec<u8>, usize> = Selector::member("v => v.Count()", |v: &Vec<u8>| v.len());
        let err = s.kind().unwrap_err();
        assert_eq!(err.selector, "v => v.Count()");
        assert_eq!(
            err.to_string(),
            "expression 'v => v.Count()' must refer to a property"
        );
    }

    #[test]
    fn recognized_constructors_are_always_valid() {
        assert_eq!(Selector::<Vec<u8>, _>::count().kind(), Ok(SelectorKind::Count));
        assert_eq!(Selector::<Vec<u8>, _>::is_empty().kind(), Ok(SelectorKind::IsEmpty));
        assert_eq!(Selector::<Vec<u8>, _>::keys().kind(), Ok(SelectorKind::Keys));
        assert_eq!(Selector::<Vec<u8>, _>::values().kind(), Ok(SelectorKind::Values));
        assert!(!SelectorKind::Other.is_enumerated());
        assert_eq!(SelectorKind::IsEmpty.to_string(), "IsEmpty");
    }
}

//! Declarator range computation and literal reclassification.

use larch_ast::{Ast, TypeLocId, TypeLocKind};
use larch_tokens::{Location, SourceSpan};

/// Finds the start of a declarator from its type location.
///
/// E.g. the `(` in `int (a)`, the `*` in `int *(a)(int)`, the first `*` in
/// `const int *const *volatile a`.
///
/// Non-trivial because type locations are stored inside out: the visit starts
/// at the outermost type node and recurses toward the written type name,
/// keeping the deepest prefix location found on the way. Declaration
/// specifiers and qualifiers cannot start a declarator, so everything that is
/// not a prefix chunk recurses without contributing a location.
pub(crate) fn declarator_start(ast: &Ast, id: TypeLocId) -> Option<Location> {
    match &ast.type_loc(id).kind {
        TypeLocKind::Paren { lparen, inner, .. } => {
            declarator_start(ast, *inner).or(Some(*lparen))
        }
        TypeLocKind::Pointer { star, pointee } => declarator_start(ast, *pointee).or(Some(*star)),
        TypeLocKind::Reference { amp, pointee } => declarator_start(ast, *pointee).or(Some(*amp)),
        TypeLocKind::MemberPointer { qualifier_span, pointee } => {
            declarator_start(ast, *pointee).or(Some(qualifier_span.begin))
        }
        // A trailing return is part of the declarator suffix; do not recurse
        // into it.
        TypeLocKind::FunctionProto { trailing_arrow: Some(_), .. } => None,
        TypeLocKind::FunctionProto { return_loc, .. } => declarator_start(ast, *return_loc),
        TypeLocKind::Array { element, .. } => declarator_start(ast, *element),
        TypeLocKind::Named { .. }
        | TypeLocKind::Decltype { .. }
        | TypeLocKind::TemplateSpec { .. } => None,
    }
}

/// The declarator span as the grammar defines it. E.g.
///     `int a;` -> `a`,
///     `int *a;` -> `*a`,
///     `int a[10];` -> `a[10]`,
///     `int *a = nullptr;` -> `*a = nullptr`.
///
/// Returns `None` when there is no declarator at all, e.g. for the parameter
/// in `void foo(int)`.
pub(crate) fn declarator_range(
    ast: &Ast,
    type_loc: TypeLocId,
    name: Option<Location>,
    initializer: Option<SourceSpan>,
) -> Option<SourceSpan> {
    let mut start = declarator_start(ast, type_loc);
    let mut end = ast.type_loc(type_loc).span.end;
    assert!(end.is_valid());
    if let Some(name) = name {
        if start.is_none() {
            start = Some(name);
        }
        if end < name {
            end = name;
        }
    }
    if let Some(initializer) = initializer {
        assert!(end <= initializer.end);
        end = initializer.end;
    }
    start.map(|start| SourceSpan::new(start, end))
}

/// Tells integer and floating numeric literals apart by spelling.
///
/// Raw and template literal operators leave the operand category out of the
/// semantic node, so the driver rereads the token: a fraction or an exponent
/// makes it floating. Digit separators and suffixes are stepped over; for hex
/// literals `e` is a digit and `p` the exponent marker.
pub(crate) fn numeric_literal_is_floating(spelling: &str) -> bool {
    let bytes = spelling.as_bytes();
    let hex = bytes.len() > 1 && bytes[0] == b'0' && (bytes[1] | 0x20) == b'x';
    let mut i = if hex { 2 } else { 0 };
    while i < bytes.len() {
        let byte = bytes[i];
        let is_digit =
            if hex { byte.is_ascii_hexdigit() } else { byte.is_ascii_digit() } || byte == b'\'';
        if is_digit {
            i += 1;
            continue;
        }
        match byte {
            b'.' => return true,
            b'e' | b'E' if !hex => return true,
            b'p' | b'P' if hex => return true,
            _ => return false, // start of the suffix
        }
    }
    false
}

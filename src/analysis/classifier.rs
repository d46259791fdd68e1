//! Rude edit classification.
//!
//! Top-level edits are dispatched on edit kind and node kind. Every labeled
//! declaration kind has an arm; an edit on any other kind is a bug in the
//! comparer and panics.
//!
//! Body edits are free except for the rules on lambdas, local functions,
//! captured variables and switch patterns around active statements.

use tracing::trace;

use crate::base::TextRange;
use crate::compare::{Edit, EditKind, EditMap, EditScript, NestedBodyMatch, TopMatch, declaration_name};
use crate::parser::SyntaxKind;
use crate::syntax::ast::{AccessorList, Lambda, Parameter, SwitchSection, TypeDeclaration};
use crate::syntax::{AstNode, NodeRef, are_equivalent_exact, are_equivalent_ignoring_lambda_bodies};

use super::active_statement::{LocatedStatement, governing_expression};
use super::body::{BodyContext, member_body};
use super::display::{deleted_node_span, diagnostic_span, display_name};
use super::options::AnalyzerOptions;
use super::rude_edit::{RudeEditDiagnostic, RudeEditKind};
use super::semantic::{CapturedVariable, SymbolLookup};
use super::state_machine::report_async_to_sync;

// ============================================================================
// Top-level edits
// ============================================================================

/// Classifies the edits of a top-level match
pub(crate) struct TopEditClassifier<'a, 't> {
    pub top_match: &'a TopMatch<'t>,
    pub edit_map: EditMap,
    pub options: &'a AnalyzerOptions,
    pub symbols: &'a dyn SymbolLookup,
    pub diagnostics: Vec<RudeEditDiagnostic>,
}

impl<'a, 't> TopEditClassifier<'a, 't> {
    pub fn new(
        top_match: &'a TopMatch<'t>,
        script: &EditScript<'t>,
        options: &'a AnalyzerOptions,
        symbols: &'a dyn SymbolLookup,
    ) -> Self {
        Self {
            top_match,
            edit_map: script.edit_map(),
            options,
            symbols,
            diagnostics: Vec::new(),
        }
    }

    pub fn classify(&mut self, edit: &Edit<'t>) {
        if self.edit_map.has_parent_edit(edit) {
            return;
        }
        match *edit {
            Edit::Insert { new } => self.classify_insert(new),
            Edit::Delete { old } => self.classify_delete(old),
            Edit::Update { old, new } => self.classify_update(old, new),
            Edit::Move { new, .. } => self.report(RudeEditKind::Move, new, EditKind::Move),
            Edit::Reorder { new, .. } => self.classify_reorder(new),
        }
    }

    fn push(&mut self, diagnostic: RudeEditDiagnostic) {
        trace!(kind = %diagnostic.kind, span = ?diagnostic.span, "rude edit");
        self.diagnostics.push(diagnostic);
    }

    /// Report `kind` at the diagnostic span of `node` with its display name
    fn report(&mut self, kind: RudeEditKind, node: NodeRef<'t>, edit: EditKind) {
        let diagnostic = RudeEditDiagnostic::new(kind, diagnostic_span(node, edit))
            .with_node(node.kind())
            .with_argument(display_name(node, edit));
        self.push(diagnostic);
    }

    fn report_deleted(&mut self, old: NodeRef<'t>, argument: &str) {
        let span = deleted_node_span(old, |n| self.top_match.partner_in_new(n));
        let diagnostic = RudeEditDiagnostic::new(RudeEditKind::Delete, span)
            .with_node(old.kind())
            .with_argument(argument);
        self.push(diagnostic);
    }

    // ------------------------------------------------------------------------
    // Insert
    // ------------------------------------------------------------------------

    fn classify_insert(&mut self, new: NodeRef<'t>) {
        match new.kind() {
            SyntaxKind::USING_DIRECTIVE | SyntaxKind::NAMESPACE_DECLARATION | SyntaxKind::DESTRUCTOR_DECLARATION => {
                self.report(RudeEditKind::Insert, new, EditKind::Insert)
            }

            SyntaxKind::CLASS_DECLARATION | SyntaxKind::STRUCT_DECLARATION => {
                // New types are fine as long as they declare nothing extern
                let extern_members: Vec<_> = TypeDeclaration(new)
                    .members()
                    .filter(|m| m.has_token(SyntaxKind::EXTERN_KW))
                    .collect();
                for member in extern_members {
                    self.report(RudeEditKind::InsertExtern, member, EditKind::Insert);
                }
            }

            SyntaxKind::INTERFACE_DECLARATION | SyntaxKind::ENUM_DECLARATION | SyntaxKind::DELEGATE_DECLARATION => {}

            SyntaxKind::CONSTRUCTOR_DECLARATION if is_parameterless(new) => {
                if new.has_modifier(SyntaxKind::EXTERN_KW) {
                    self.report(RudeEditKind::InsertExtern, new, EditKind::Insert);
                }
            }

            SyntaxKind::PROPERTY_DECLARATION
            | SyntaxKind::CONSTRUCTOR_DECLARATION
            | SyntaxKind::FIELD_DECLARATION
            | SyntaxKind::VARIABLE_DECLARATION
            | SyntaxKind::VARIABLE_DECLARATOR => self.classify_member_insert(new, new),

            SyntaxKind::GET_ACCESSOR_DECLARATION | SyntaxKind::SET_ACCESSOR_DECLARATION => {
                match new.parent().and_then(|list| list.parent()) {
                    Some(property) => self.classify_member_insert(property, new),
                    None => self.report(RudeEditKind::Insert, new, EditKind::Insert),
                }
            }

            SyntaxKind::OPERATOR_DECLARATION => self.report(RudeEditKind::InsertOperator, new, EditKind::Insert),

            SyntaxKind::METHOD_DECLARATION => {
                if new.child_node(SyntaxKind::TYPE_PARAMETER_LIST).is_some() {
                    self.report(RudeEditKind::InsertGenericMethod, new, EditKind::Insert);
                } else if new.child_node(SyntaxKind::EXPLICIT_INTERFACE_SPECIFIER).is_some() {
                    self.report(
                        RudeEditKind::InsertMethodWithExplicitInterfaceSpecifier,
                        new,
                        EditKind::Insert,
                    );
                } else {
                    self.classify_member_insert(new, new);
                }
            }

            SyntaxKind::ACCESSOR_LIST | SyntaxKind::PARAMETER_LIST => {}

            SyntaxKind::TYPE_PARAMETER_LIST => match new.parent().map(|p| p.kind()) {
                Some(SyntaxKind::METHOD_DECLARATION) => {
                    self.report(RudeEditKind::GenericMethodUpdate, new, EditKind::Insert)
                }
                Some(kind) if kind.is_type_declaration() || kind == SyntaxKind::DELEGATE_DECLARATION => {
                    self.report(RudeEditKind::GenericTypeUpdate, new, EditKind::Insert)
                }
                _ => self.report(RudeEditKind::Insert, new, EditKind::Insert),
            },

            SyntaxKind::ENUM_MEMBER_DECLARATION
            | SyntaxKind::TYPE_PARAMETER
            | SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE
            | SyntaxKind::PARAMETER
            | SyntaxKind::ATTRIBUTE
            | SyntaxKind::ATTRIBUTE_LIST => self.report(RudeEditKind::Insert, new, EditKind::Insert),

            kind => unreachable!("unexpected {kind:?} in a top-level insert"),
        }
    }

    /// Insert of `node` which belongs to `member` into an existing type
    fn classify_member_insert(&mut self, member: NodeRef<'t>, node: NodeRef<'t>) {
        let member = field_of(member).unwrap_or(member);
        if member.has_modifier(SyntaxKind::EXTERN_KW) {
            self.report(RudeEditKind::InsertExtern, node, EditKind::Insert);
            return;
        }
        if member.has_modifier(SyntaxKind::VIRTUAL_KW)
            || member.has_modifier(SyntaxKind::ABSTRACT_KW)
            || member.has_modifier(SyntaxKind::OVERRIDE_KW)
        {
            self.report(RudeEditKind::InsertVirtual, node, EditKind::Insert);
            return;
        }
        let in_interface = member
            .parent()
            .is_some_and(|t| t.kind() == SyntaxKind::INTERFACE_DECLARATION);
        if in_interface {
            let is_virtual = member.kind() != SyntaxKind::FIELD_DECLARATION
                && !member.has_modifier(SyntaxKind::SEALED_KW)
                && !member.has_modifier(SyntaxKind::STATIC_KW);
            let kind = if is_virtual {
                RudeEditKind::InsertVirtual
            } else {
                RudeEditKind::InsertIntoInterface
            };
            self.report(kind, node, EditKind::Insert);
        }
    }

    // ------------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------------

    fn classify_delete(&mut self, old: NodeRef<'t>) {
        match old.kind() {
            SyntaxKind::USING_DIRECTIVE
            | SyntaxKind::NAMESPACE_DECLARATION
            | SyntaxKind::CLASS_DECLARATION
            | SyntaxKind::STRUCT_DECLARATION
            | SyntaxKind::INTERFACE_DECLARATION
            | SyntaxKind::ENUM_DECLARATION
            | SyntaxKind::DELEGATE_DECLARATION
            | SyntaxKind::GET_ACCESSOR_DECLARATION
            | SyntaxKind::SET_ACCESSOR_DECLARATION
            | SyntaxKind::ATTRIBUTE
            | SyntaxKind::ATTRIBUTE_LIST
            | SyntaxKind::ENUM_MEMBER_DECLARATION
            | SyntaxKind::TYPE_PARAMETER
            | SyntaxKind::TYPE_PARAMETER_LIST
            | SyntaxKind::PARAMETER
            | SyntaxKind::PARAMETER_LIST
            | SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE => {
                self.report_deleted(old, display_name(old, EditKind::Delete))
            }

            SyntaxKind::CONSTRUCTOR_DECLARATION if is_parameterless(old) => {}

            SyntaxKind::METHOD_DECLARATION
            | SyntaxKind::OPERATOR_DECLARATION
            | SyntaxKind::DESTRUCTOR_DECLARATION
            | SyntaxKind::CONSTRUCTOR_DECLARATION
            | SyntaxKind::PROPERTY_DECLARATION
            | SyntaxKind::FIELD_DECLARATION
            | SyntaxKind::VARIABLE_DECLARATION
            | SyntaxKind::VARIABLE_DECLARATOR => {
                let still_declared = self.options.defer_member_deletes_to_semantics
                    && self
                        .symbols
                        .member_still_declared(old, self.top_match.new_root());
                if !still_declared {
                    self.report_deleted(old, display_name(old, EditKind::Delete));
                }
            }

            SyntaxKind::ACCESSOR_LIST => {
                if AccessorList(old).has_setter() {
                    self.report_deleted(old, "property setter");
                }
            }

            kind => unreachable!("unexpected {kind:?} in a top-level delete"),
        }
    }

    // ------------------------------------------------------------------------
    // Reorder
    // ------------------------------------------------------------------------

    fn classify_reorder(&mut self, new: NodeRef<'t>) {
        match new.kind() {
            // Declaration order is observable for these
            SyntaxKind::PROPERTY_DECLARATION
            | SyntaxKind::FIELD_DECLARATION
            | SyntaxKind::VARIABLE_DECLARATOR
            | SyntaxKind::ENUM_MEMBER_DECLARATION
            | SyntaxKind::TYPE_PARAMETER
            | SyntaxKind::PARAMETER => self.report(RudeEditKind::Move, new, EditKind::Reorder),

            SyntaxKind::USING_DIRECTIVE
            | SyntaxKind::NAMESPACE_DECLARATION
            | SyntaxKind::CLASS_DECLARATION
            | SyntaxKind::STRUCT_DECLARATION
            | SyntaxKind::INTERFACE_DECLARATION
            | SyntaxKind::ENUM_DECLARATION
            | SyntaxKind::DELEGATE_DECLARATION
            | SyntaxKind::VARIABLE_DECLARATION
            | SyntaxKind::METHOD_DECLARATION
            | SyntaxKind::OPERATOR_DECLARATION
            | SyntaxKind::CONSTRUCTOR_DECLARATION
            | SyntaxKind::DESTRUCTOR_DECLARATION
            | SyntaxKind::GET_ACCESSOR_DECLARATION
            | SyntaxKind::SET_ACCESSOR_DECLARATION
            | SyntaxKind::ACCESSOR_LIST
            | SyntaxKind::TYPE_PARAMETER_LIST
            | SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE
            | SyntaxKind::PARAMETER_LIST
            | SyntaxKind::ATTRIBUTE_LIST
            | SyntaxKind::ATTRIBUTE => {}

            kind => unreachable!("unexpected {kind:?} in a top-level reorder"),
        }
    }

    // ------------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------------

    fn classify_update(&mut self, old: NodeRef<'t>, new: NodeRef<'t>) {
        let kind = update_rude_edit(old, new);
        if let Some(kind) = kind {
            self.report(kind, new, EditKind::Update);
        }
        // Recompiled bodies must not contain constructs that cannot be remapped
        let recompiled = matches!(
            kind,
            None | Some(RudeEditKind::GenericMethodUpdate | RudeEditKind::GenericTypeUpdate)
        );
        if recompiled {
            if let (Some(old_body), Some(new_body)) = (member_body(old), member_body(new)) {
                if !are_equivalent_exact(old_body, new_body) {
                    report_body_shape(new, new_body, &mut self.diagnostics);
                }
            }
        }
    }
}

/// `stackalloc` and switch expressions in a body that is recompiled.
/// Lambdas and local functions are not entered.
pub(crate) fn report_body_shape(member: NodeRef<'_>, root: NodeRef<'_>, diagnostics: &mut Vec<RudeEditDiagnostic>) {
    let argument = display_name(member, EditKind::Update);
    let nodes = root.descendants_with(|n| !n.kind().is_nested_function());
    for node in nodes {
        let kind = match node.kind() {
            SyntaxKind::STACKALLOC_ARRAY_CREATION_EXPRESSION => RudeEditKind::StackAllocUpdate,
            SyntaxKind::SWITCH_EXPRESSION => RudeEditKind::SwitchExpressionUpdate,
            _ => continue,
        };
        trace!(%kind, node = ?node, "rude body construct");
        diagnostics.push(
            RudeEditDiagnostic::new(kind, node.range())
                .with_node(node.kind())
                .with_argument(argument),
        );
        if kind == RudeEditKind::StackAllocUpdate {
            return;
        }
    }
}

/// First rule that makes an update of a declaration rude
fn update_rude_edit(old: NodeRef<'_>, new: NodeRef<'_>) -> Option<RudeEditKind> {
    use RudeEditKind as R;

    let renamed = || declaration_name(old) != declaration_name(new);
    let retyped = || !optional_exact(old.child_node(SyntaxKind::TYPE), new.child_node(SyntaxKind::TYPE));
    let modifiers_changed = || modifiers(old, false) != modifiers(new, false);
    let attributes_changed = || !attribute_lists_equal(old, new);

    match old.kind() {
        SyntaxKind::COMPILATION_UNIT => None,

        SyntaxKind::NAMESPACE_DECLARATION => renamed().then_some(R::Renamed),

        SyntaxKind::CLASS_DECLARATION | SyntaxKind::STRUCT_DECLARATION | SyntaxKind::INTERFACE_DECLARATION => {
            if old.kind() != new.kind() {
                Some(R::TypeKindUpdate)
            } else if modifiers_changed() {
                Some(R::ModifiersUpdate)
            } else if renamed() {
                Some(R::Renamed)
            } else if !optional_exact(old.child_node(SyntaxKind::BASE_LIST), new.child_node(SyntaxKind::BASE_LIST)) {
                Some(R::BaseTypeOrInterfaceUpdate)
            } else {
                None
            }
        }

        SyntaxKind::ENUM_DECLARATION => {
            if modifiers_changed() {
                Some(R::ModifiersUpdate)
            } else if renamed() {
                Some(R::Renamed)
            } else if !optional_exact(old.child_node(SyntaxKind::BASE_LIST), new.child_node(SyntaxKind::BASE_LIST)) {
                Some(R::EnumUnderlyingTypeUpdate)
            } else {
                None
            }
        }

        SyntaxKind::DELEGATE_DECLARATION => {
            if modifiers_changed() {
                Some(R::ModifiersUpdate)
            } else if retyped() {
                Some(R::TypeUpdate)
            } else if renamed() {
                Some(R::Renamed)
            } else {
                None
            }
        }

        SyntaxKind::FIELD_DECLARATION => {
            if old.has_token(SyntaxKind::CONST_KW) != new.has_token(SyntaxKind::CONST_KW) {
                Some(R::FieldKindUpdate)
            } else if modifiers_changed() {
                Some(R::ModifiersUpdate)
            } else {
                None
            }
        }

        SyntaxKind::VARIABLE_DECLARATION => retyped().then_some(R::TypeUpdate),

        SyntaxKind::VARIABLE_DECLARATOR => {
            let initializer_changed = !optional_exact(
                old.child_node(SyntaxKind::EQUALS_VALUE_CLAUSE),
                new.child_node(SyntaxKind::EQUALS_VALUE_CLAUSE),
            );
            if renamed() {
                Some(R::Renamed)
            } else if !initializer_changed {
                None
            } else if field_of(new).is_some_and(|f| f.has_token(SyntaxKind::CONST_KW)) {
                Some(R::InitializerUpdate)
            } else if in_generic_type(new) {
                Some(R::GenericTypeInitializerUpdate)
            } else {
                None
            }
        }

        SyntaxKind::METHOD_DECLARATION => {
            if renamed() {
                Some(R::Renamed)
            } else if modifiers(old, true) != modifiers(new, true) {
                Some(R::ModifiersUpdate)
            } else if retyped() {
                Some(R::TypeUpdate)
            } else if !optional_exact(
                old.child_node(SyntaxKind::EXPLICIT_INTERFACE_SPECIFIER),
                new.child_node(SyntaxKind::EXPLICIT_INTERFACE_SPECIFIER),
            ) {
                Some(R::Renamed)
            } else {
                body_update(old, new)
            }
        }

        SyntaxKind::CONSTRUCTOR_DECLARATION | SyntaxKind::DESTRUCTOR_DECLARATION => {
            if modifiers_changed() {
                Some(R::ModifiersUpdate)
            } else {
                let initializer_changed = !optional_exact(
                    old.child_node(SyntaxKind::CONSTRUCTOR_INITIALIZER),
                    new.child_node(SyntaxKind::CONSTRUCTOR_INITIALIZER),
                );
                body_update(old, new).or_else(|| {
                    (initializer_changed && in_generic_type(new)).then_some(R::GenericTypeUpdate)
                })
            }
        }

        SyntaxKind::OPERATOR_DECLARATION => {
            if modifiers_changed() {
                Some(R::ModifiersUpdate)
            } else if retyped() {
                Some(R::TypeUpdate)
            } else {
                body_update(old, new)
            }
        }

        SyntaxKind::PROPERTY_DECLARATION => {
            if modifiers_changed() {
                Some(R::ModifiersUpdate)
            } else if retyped() {
                Some(R::TypeUpdate)
            } else if renamed() {
                Some(R::Renamed)
            } else if !in_generic_type(new) {
                None
            } else if !optional_exact(
                old.child_node(SyntaxKind::ARROW_EXPRESSION_CLAUSE),
                new.child_node(SyntaxKind::ARROW_EXPRESSION_CLAUSE),
            ) {
                Some(R::GenericTypeUpdate)
            } else if !optional_exact(
                old.child_node(SyntaxKind::EQUALS_VALUE_CLAUSE),
                new.child_node(SyntaxKind::EQUALS_VALUE_CLAUSE),
            ) {
                Some(R::GenericTypeInitializerUpdate)
            } else {
                None
            }
        }

        SyntaxKind::GET_ACCESSOR_DECLARATION | SyntaxKind::SET_ACCESSOR_DECLARATION => {
            if old.kind() != new.kind() {
                Some(R::AccessorKindUpdate)
            } else if modifiers_changed() {
                Some(R::ModifiersUpdate)
            } else if attributes_changed() {
                Some(R::Update)
            } else {
                body_update(old, new)
            }
        }

        SyntaxKind::ENUM_MEMBER_DECLARATION => {
            if renamed() {
                Some(R::Renamed)
            } else if attributes_changed() {
                Some(R::Update)
            } else {
                Some(R::InitializerUpdate)
            }
        }

        SyntaxKind::TYPE_PARAMETER => {
            if renamed() {
                Some(R::Renamed)
            } else if attributes_changed() {
                Some(R::Update)
            } else {
                Some(R::VarianceUpdate)
            }
        }

        SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE | SyntaxKind::ATTRIBUTE | SyntaxKind::USING_DIRECTIVE => {
            Some(R::Update)
        }

        SyntaxKind::PARAMETER => {
            let (old_param, new_param) = (Parameter(old), Parameter(new));
            if renamed() {
                Some(R::Renamed)
            } else if old_param.modifiers().collect::<Vec<_>>() != new_param.modifiers().collect::<Vec<_>>() {
                Some(R::ModifiersUpdate)
            } else if retyped() {
                Some(R::TypeUpdate)
            } else if !optional_exact(old_param.default_value(), new_param.default_value()) {
                Some(R::InitializerUpdate)
            } else {
                // Only the attribute lists are left
                Some(R::Update)
            }
        }

        // Only the target (`[return: A]`) is part of the list's value
        SyntaxKind::ATTRIBUTE_LIST => Some(R::Update),

        SyntaxKind::TYPE_PARAMETER_LIST | SyntaxKind::PARAMETER_LIST | SyntaxKind::ACCESSOR_LIST => None,

        kind => unreachable!("unexpected {kind:?} in a top-level update"),
    }
}

/// Rules on the body of a member with an unchanged signature
fn body_update(old: NodeRef<'_>, new: NodeRef<'_>) -> Option<RudeEditKind> {
    let old_body = member_body(old);
    let new_body = member_body(new);
    match (old_body, new_body) {
        (None, Some(_)) => Some(RudeEditKind::MethodBodyAdd),
        (Some(_), None) => Some(RudeEditKind::MethodBodyDelete),
        (Some(o), Some(n)) if !are_equivalent_exact(o, n) => {
            if new.child_node(SyntaxKind::TYPE_PARAMETER_LIST).is_some() {
                Some(RudeEditKind::GenericMethodUpdate)
            } else if in_generic_type(new) {
                Some(RudeEditKind::GenericTypeUpdate)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Attribute lists written directly on a declaration, compared in order
fn attribute_lists_equal(old: NodeRef<'_>, new: NodeRef<'_>) -> bool {
    let (old_lists, new_lists) = (attribute_lists(old), attribute_lists(new));
    old_lists.len() == new_lists.len()
        && old_lists
            .into_iter()
            .zip(new_lists)
            .all(|(o, n)| are_equivalent_exact(o, n))
}

fn attribute_lists<'t>(node: NodeRef<'t>) -> Vec<NodeRef<'t>> {
    node.children()
        .filter(|c| c.kind() == SyntaxKind::ATTRIBUTE_LIST)
        .collect()
}

fn optional_exact(old: Option<NodeRef<'_>>, new: Option<NodeRef<'_>>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => are_equivalent_exact(old, new),
        (None, None) => true,
        _ => false,
    }
}

/// Sorted modifier keywords of a declaration
fn modifiers(node: NodeRef<'_>, ignore_async: bool) -> Vec<SyntaxKind> {
    let mut result: Vec<_> = node
        .tokens()
        .map(|t| t.kind())
        .filter(|k| k.is_modifier() && !(ignore_async && *k == SyntaxKind::ASYNC_KW))
        .collect();
    result.sort_by_key(|k| *k as u16);
    result
}

fn is_parameterless(node: NodeRef<'_>) -> bool {
    node.child_node(SyntaxKind::PARAMETER_LIST)
        .is_none_or(|list| list.children().next().is_none())
}

/// The field declaration a field variable declaration or declarator belongs to
fn field_of(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    match node.kind() {
        SyntaxKind::VARIABLE_DECLARATION | SyntaxKind::VARIABLE_DECLARATOR => node
            .ancestors()
            .find(|a| a.kind() == SyntaxKind::FIELD_DECLARATION),
        _ => None,
    }
}

pub(crate) fn in_generic_type(node: NodeRef<'_>) -> bool {
    node.ancestors()
        .skip(1)
        .any(|a| a.kind().is_type_declaration() && a.child_node(SyntaxKind::TYPE_PARAMETER_LIST).is_some())
}

// ============================================================================
// Body edits
// ============================================================================

/// Lambda, local function and capture rules for one matched member body
pub(crate) fn classify_body_edits<'t>(
    ctx: &BodyContext<'_, 't>,
    options: &AnalyzerOptions,
    symbols: &dyn SymbolLookup,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) {
    report_lambda_kind_switches(ctx, diagnostics);
    for nested in all_nested(ctx.body_match.nested()) {
        report_nested_function_update(nested.old_function, nested.new_function, diagnostics);
    }
    if options.report_lambda_capture_changes {
        report_capture_changes(ctx, symbols, diagnostics);
    }
}

fn all_nested<'a, 't>(nested: &'a [NestedBodyMatch<'t>]) -> Vec<&'a NestedBodyMatch<'t>> {
    let mut result = Vec::new();
    for n in nested {
        result.push(n);
        result.extend(all_nested(n.body.nested()));
    }
    result
}

/// A lambda deleted and a local function inserted with the same body, or
/// the other way around
fn report_lambda_kind_switches(ctx: &BodyContext<'_, '_>, diagnostics: &mut Vec<RudeEditDiagnostic>) {
    let mut deleted = Vec::new();
    let mut inserted = Vec::new();
    for (_, script) in ctx.body_match.edit_scripts() {
        for edit in &script {
            match *edit {
                Edit::Delete { old } if old.kind().is_nested_function() => deleted.push(old),
                Edit::Insert { new } if new.kind().is_nested_function() => inserted.push(new),
                _ => {}
            }
        }
    }
    for old in deleted {
        let partner = inserted.iter().position(|new| {
            old.kind().is_lambda() != new.kind().is_lambda()
                && match (old.nested_function_body(), new.nested_function_body()) {
                    (Some(o), Some(n)) => are_equivalent_exact(o, n),
                    _ => false,
                }
        });
        if let Some(index) = partner {
            let new = inserted.remove(index);
            diagnostics.push(
                RudeEditDiagnostic::new(
                    RudeEditKind::SwitchBetweenLambdaAndLocalFunction,
                    diagnostic_span(new, EditKind::Update),
                )
                .with_node(new.kind()),
            );
        }
    }
}

/// Signature rules for a matched lambda or local function
fn report_nested_function_update(old: NodeRef<'_>, new: NodeRef<'_>, diagnostics: &mut Vec<RudeEditDiagnostic>) {
    let (old_fn, new_fn) = (Lambda(old), Lambda(new));
    let old_params = old_fn.parameters();
    let new_params = new_fn.parameters();
    let parameters_changed = old_params.len() != new_params.len()
        || old_params.iter().zip(&new_params).any(|(o, n)| {
            !optional_exact(o.ty(), n.ty()) || o.modifiers().collect::<Vec<_>>() != n.modifiers().collect::<Vec<_>>()
        });

    let span = diagnostic_span(new, EditKind::Update);
    if parameters_changed {
        diagnostics.push(
            RudeEditDiagnostic::new(RudeEditKind::ChangingLambdaParameters, span)
                .with_node(new.kind())
                .with_argument(display_name(new, EditKind::Update)),
        );
    } else if !optional_exact(old.child_node(SyntaxKind::TYPE), new.child_node(SyntaxKind::TYPE)) {
        diagnostics.push(
            RudeEditDiagnostic::new(RudeEditKind::ChangingLambdaReturnType, span)
                .with_node(new.kind())
                .with_argument(display_name(new, EditKind::Update)),
        );
    }

    if old_fn.is_async() && !new_fn.is_async() {
        report_async_to_sync(new, diagnostics);
    }
}

fn report_capture_changes<'t>(
    ctx: &BodyContext<'_, 't>,
    symbols: &dyn SymbolLookup,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) {
    let old_captures = symbols.captured_variables(ctx.old_body());
    let new_captures = symbols.captured_variables(ctx.new_body());
    let is_captured = |captures: &[CapturedVariable<'t>], declaration: NodeRef<'t>| {
        captures.iter().any(|c| c.declaration == declaration)
    };

    for captured in &new_captures {
        let Some(old) = declaration_partner(ctx, captured.declaration, Side::Old) else {
            continue;
        };
        if !is_captured(&old_captures, old) {
            diagnostics.push(
                RudeEditDiagnostic::new(RudeEditKind::CapturingVariable, variable_span(captured.declaration))
                    .with_node(captured.declaration.kind())
                    .with_argument(captured.name),
            );
        }
    }

    for captured in &old_captures {
        match declaration_partner(ctx, captured.declaration, Side::New) {
            Some(new) if !is_captured(&new_captures, new) => diagnostics.push(
                RudeEditDiagnostic::new(RudeEditKind::NotCapturingVariable, variable_span(new))
                    .with_node(new.kind())
                    .with_argument(captured.name),
            ),
            Some(_) => {}
            None => {
                let span = deleted_node_span(captured.declaration, |n| ctx.partner_in_new(n));
                diagnostics.push(
                    RudeEditDiagnostic::new(RudeEditKind::DeletingCapturedVariable, span)
                        .with_node(captured.declaration.kind())
                        .with_argument(captured.name),
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Old,
    New,
}

/// Counterpart of a variable declaration in the other tree. Parameters
/// are found by name in the partner of their function.
fn declaration_partner<'t>(ctx: &BodyContext<'_, 't>, declaration: NodeRef<'t>, to: Side) -> Option<NodeRef<'t>> {
    let partner = |n: NodeRef<'t>| match to {
        Side::New => ctx.partner_in_new(n),
        Side::Old => ctx.partner_in_old(n),
    };
    if declaration.kind() != SyntaxKind::PARAMETER {
        return partner(declaration);
    }
    let name = declaration.identifier()?.text();
    let function = declaration
        .ancestors()
        .skip(1)
        .find(|a| a.kind() != SyntaxKind::PARAMETER_LIST)?;
    let other = partner(function)?;
    let parameters: Vec<_> = if other.kind().is_nested_function() {
        Lambda(other).parameters()
    } else {
        other
            .child_node(SyntaxKind::PARAMETER_LIST)
            .into_iter()
            .flat_map(|list| list.children().filter_map(Parameter::cast))
            .collect()
    };
    parameters
        .into_iter()
        .find(|p| p.name().is_some_and(|t| t.text() == name))
        .map(|p| p.syntax())
}

fn variable_span(declaration: NodeRef<'_>) -> TextRange {
    let identifier = match declaration.kind() {
        SyntaxKind::CATCH_DECLARATION
        | SyntaxKind::VARIABLE_DECLARATOR
        | SyntaxKind::PARAMETER
        | SyntaxKind::FOREACH_STATEMENT => declaration.identifier(),
        _ => None,
    };
    identifier.map_or(declaration.range(), |t| t.range())
}

// ============================================================================
// Switch patterns
// ============================================================================

/// A switch whose `when` clause holds an active statement is compiled into
/// one decision tree; its governing expression and labels must not change
pub(crate) fn report_switch_pattern_changes<'t>(
    ctx: &BodyContext<'_, 't>,
    statements: &[LocatedStatement<'t>],
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) {
    let mut reported = Vec::new();
    for statement in statements {
        let Some(old_switch) = statement
            .node
            .ancestors()
            .skip_while(|a| a.kind() != SyntaxKind::WHEN_CLAUSE)
            .find(|a| a.kind() == SyntaxKind::SWITCH_STATEMENT)
        else {
            continue;
        };
        let Some(new_switch) = ctx.partner_in_new(old_switch) else {
            continue;
        };
        if reported.contains(&new_switch) {
            continue;
        }
        if !are_equivalent_switch_patterns(old_switch, new_switch) {
            reported.push(new_switch);
            diagnostics.push(
                RudeEditDiagnostic::new(
                    RudeEditKind::UpdateAroundActiveStatement,
                    diagnostic_span(new_switch, EditKind::Update),
                )
                .with_node(new_switch.kind())
                .with_argument(display_name(new_switch, EditKind::Update)),
            );
        }
    }
}

fn switch_labels<'t>(switch: NodeRef<'t>) -> Vec<NodeRef<'t>> {
    switch
        .children()
        .filter_map(SwitchSection::cast)
        .flat_map(|section| section.labels())
        .collect()
}

fn are_equivalent_switch_patterns(old: NodeRef<'_>, new: NodeRef<'_>) -> bool {
    let old_labels = switch_labels(old);
    let new_labels = switch_labels(new);
    let same_expression = match (governing_expression(old), governing_expression(new)) {
        (Some(o), Some(n)) => are_equivalent_ignoring_lambda_bodies(o, n),
        (None, None) => true,
        _ => false,
    };
    same_expression
        && old_labels.len() == new_labels.len()
        && old_labels.iter().zip(&new_labels).all(|(o, n)| are_equivalent_exact(*o, *n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::TopSyntaxComparer;
    use crate::compare::{Match, MatchingDistance};
    use crate::syntax::SyntaxTree;
    use super::super::semantic::SyntacticSymbolLookup;
    use rstest::rstest;

    /// Symbol lookup that finds every member in some other document
    struct DeclaredElsewhere;

    impl SymbolLookup for DeclaredElsewhere {
        fn member_still_declared(&self, _old_member: NodeRef<'_>, _new_root: NodeRef<'_>) -> bool {
            true
        }

        fn captured_variables<'t>(&self, body: NodeRef<'t>) -> Vec<CapturedVariable<'t>> {
            SyntacticSymbolLookup.captured_variables(body)
        }
    }

    fn classify_with(old: &str, new: &str, options: AnalyzerOptions, symbols: &dyn SymbolLookup) -> Vec<RudeEditKind> {
        let old = SyntaxTree::parse(old);
        let new = SyntaxTree::parse(new);
        let top = Match::with_known_matches(TopSyntaxComparer::new(), old.root(), new.root(), &[], MatchingDistance::MAX);
        let script = top.edit_script();
        let mut classifier = TopEditClassifier::new(&top, &script, &options, symbols);
        for edit in &script {
            classifier.classify(edit);
        }
        classifier.diagnostics.into_iter().map(|d| d.kind).collect()
    }

    fn classify_top(old: &str, new: &str, options: AnalyzerOptions) -> Vec<RudeEditKind> {
        classify_with(old, new, options, &SyntacticSymbolLookup)
    }

    #[rstest]
    #[case("class C { void M() { F(1); } }", "class C { void M() { F(2); } }", vec![])]
    #[case("class C { void M() { } }", "class C { void M<T>() { } }", vec![RudeEditKind::GenericMethodUpdate])]
    #[case("class C { void M<T>() { F(1); } }", "class C { void M<T>() { F(2); } }", vec![RudeEditKind::GenericMethodUpdate])]
    #[case("class C<T> { void M() { F(1); } }", "class C<T> { void M() { F(2); } }", vec![RudeEditKind::GenericTypeUpdate])]
    #[case("class C { void M() { } }", "class C { void N() { } }", vec![RudeEditKind::Renamed])]
    #[case("class C { void M() { } }", "class C { public void M() { } }", vec![RudeEditKind::ModifiersUpdate])]
    #[case("class C { void M() { } }", "class C { async void M() { } }", vec![])]
    #[case("class C { void M() { } }", "class C { int M() { } }", vec![RudeEditKind::TypeUpdate])]
    #[case("class C { abstract void M(); }", "class C { abstract void M() { } }", vec![RudeEditKind::MethodBodyAdd])]
    #[case("class C { const int X = 1; }", "class C { const int X = 2; }", vec![RudeEditKind::InitializerUpdate])]
    #[case("class C { int x = 1; }", "class C { int x = 2; }", vec![])]
    #[case("class C<T> { int x = 1; }", "class C<T> { int x = 2; }", vec![RudeEditKind::GenericTypeInitializerUpdate])]
    #[case("class C { int a; int b; }", "class C { int b; int a; }", vec![RudeEditKind::Move])]
    #[case("class C { }", "struct C { }", vec![RudeEditKind::TypeKindUpdate])]
    #[case("class C : A { }", "class C : B { }", vec![RudeEditKind::BaseTypeOrInterfaceUpdate])]
    #[case("enum E : int { A }", "enum E : long { A }", vec![RudeEditKind::EnumUnderlyingTypeUpdate])]
    #[case("enum E { A = 1 }", "enum E { A = 2 }", vec![RudeEditKind::InitializerUpdate])]
    #[case("class C { void M(int a) { } }", "class C { void M(int b) { } }", vec![RudeEditKind::Renamed])]
    #[case("class C { void M(int a) { } }", "class C { void M(ref int a) { } }", vec![RudeEditKind::ModifiersUpdate])]
    #[case("class C { void M(int a = 1) { } }", "class C { void M(int a = 2) { } }", vec![RudeEditKind::InitializerUpdate])]
    #[case("interface I<T> { }", "interface I<out T> { }", vec![RudeEditKind::VarianceUpdate])]
    #[case("class C { }", "class C { void M() { } }", vec![])]
    #[case("class C { }", "class C { virtual void M() { } }", vec![RudeEditKind::InsertVirtual])]
    #[case("class C { }", "class C { extern void M(); }", vec![RudeEditKind::InsertExtern])]
    #[case("class C { }", "class C { void M<T>() { } }", vec![RudeEditKind::InsertGenericMethod])]
    #[case("class C { }", "class C { void I.M() { } }", vec![RudeEditKind::InsertMethodWithExplicitInterfaceSpecifier])]
    #[case("class C { }", "class C { public static C operator +(C a, C b) { return a; } }", vec![RudeEditKind::InsertOperator])]
    #[case("interface I { }", "interface I { void M(); }", vec![RudeEditKind::InsertVirtual])]
    #[case("class C { }", "class C { ~C() { } }", vec![RudeEditKind::Insert])]
    #[case("class C { }", "class C { } class D { virtual void M() { } }", vec![])]
    #[case("class C { }", "class C { } class D { extern void M(); }", vec![RudeEditKind::InsertExtern])]
    #[case("using A;", "using A; using B;", vec![RudeEditKind::Insert])]
    #[case("enum E { A }", "enum E { A, B }", vec![RudeEditKind::Insert])]
    #[case("class C { void M(int a) { } }", "class C { void M(int a, int b) { } }", vec![RudeEditKind::Insert])]
    #[case("class C { [A] void M() { } }", "class C { [B] void M() { } }", vec![RudeEditKind::Update])]
    #[case("class C { void M([A] int a) { } }", "class C { void M([B] int a) { } }", vec![RudeEditKind::Update])]
    #[case("class C { void M(int a) { } }", "class C { void M([A] int a) { } }", vec![RudeEditKind::Update])]
    #[case("class C { int P { [A] get; set; } }", "class C { int P { get; set; } }", vec![RudeEditKind::Update])]
    #[case("enum E { [A] X = 1 }", "enum E { [B] X = 1 }", vec![RudeEditKind::Update])]
    #[case("class C<[A] T> { }", "class C<[B] T> { }", vec![RudeEditKind::Update])]
    #[case("class C { int P { get; set; } }", "class C { int P { get; } }", vec![RudeEditKind::Delete])]
    #[case("class C { int P { get; } }", "class C { int P { get; set; } }", vec![])]
    #[case("enum E { A, B }", "enum E { B, A }", vec![RudeEditKind::Move])]
    #[case("class C { void M() { } void N() { } }", "class C { void N() { } void M() { } }", vec![])]
    #[case("using A; using B;", "using B; using A;", vec![])]
    #[case("class C { } class D { }", "class D { } class C { }", vec![])]
    #[case("class C { int P { get; set; } }", "class C { int P { set; get; } }", vec![])]
    #[case("class C { void M(int a, int b) { } }", "class C { void M(int b, int a) { } }", vec![RudeEditKind::Move])]
    fn test_top_level_classification(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
        assert_eq!(classify_top(old, new, AnalyzerOptions::default()), expected);
    }

    #[test]
    fn test_member_delete_is_deferred_to_symbol_lookup() {
        let old = "partial class C { void M() { } }";
        let new = "partial class C { }";
        assert!(classify_with(old, new, AnalyzerOptions::default(), &DeclaredElsewhere).is_empty());
        assert_eq!(
            classify_with(old, new, AnalyzerOptions::syntactic(), &DeclaredElsewhere),
            vec![RudeEditKind::Delete]
        );
    }

    #[test]
    fn test_member_delete_without_semantics() {
        let old = "class C { void M() { } }";
        let new = "class C { }";
        assert_eq!(
            classify_top(old, new, AnalyzerOptions::syntactic()),
            vec![RudeEditKind::Delete]
        );
        assert_eq!(classify_top(old, new, AnalyzerOptions::default()), vec![RudeEditKind::Delete]);
    }

    #[test]
    fn test_deleted_type_reported_once() {
        let kinds = classify_top("class C { } class D { void M() { } }", "class C { }", AnalyzerOptions::syntactic());
        assert_eq!(kinds, vec![RudeEditKind::Delete]);
    }
}

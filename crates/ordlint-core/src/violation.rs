//! Ordering and spacing diagnostics

/// What a violation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Two elements of the same group are in the wrong relative order.
    Order,
    /// An element of a later group precedes an element of an earlier group.
    GroupOrder,
    /// A dependency is declared after the element that references it.
    DependencyOrder,
    /// Fewer blank lines than required between two elements.
    MissingSpacing,
    /// More blank lines than required between two elements.
    ExtraSpacing,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ViolationKind::Order => "order",
            ViolationKind::GroupOrder => "group-order",
            ViolationKind::DependencyOrder => "dependency-order",
            ViolationKind::MissingSpacing => "missing-spacing",
            ViolationKind::ExtraSpacing => "extra-spacing",
        };
        f.write_str(s)
    }
}

/// A single diagnostic about one adjacent pair of elements.
///
/// `left`/`right` name the pair in source order; for the ordering kinds the
/// violation states that `right` must precede `left`. For dependency-order,
/// `left` is the dependent and `right` the dependency.
#[derive(Debug, Clone)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    pub left: String,
    pub right: String,
    pub left_group: Option<String>,
    pub right_group: Option<String>,
    pub expected_newlines: Option<usize>,
    pub actual_newlines: Option<usize>,
}

impl Violation {
    pub fn order(left: impl Into<String>, right: impl Into<String>) -> Self {
        let left = left.into();
        let right = right.into();
        Self {
            kind: ViolationKind::Order,
            message: format!("Expected '{}' to come before '{}'.", right, left),
            left,
            right,
            left_group: None,
            right_group: None,
            expected_newlines: None,
            actual_newlines: None,
        }
    }

    pub fn group_order(
        left: impl Into<String>,
        right: impl Into<String>,
        left_group: impl Into<String>,
        right_group: impl Into<String>,
    ) -> Self {
        let left = left.into();
        let right = right.into();
        let left_group = left_group.into();
        let right_group = right_group.into();
        Self {
            kind: ViolationKind::GroupOrder,
            message: format!(
                "Expected '{}' (group '{}') to come before '{}' (group '{}').",
                right, right_group, left, left_group
            ),
            left,
            right,
            left_group: Some(left_group),
            right_group: Some(right_group),
            expected_newlines: None,
            actual_newlines: None,
        }
    }

    pub fn dependency_order(dependent: impl Into<String>, dependency: impl Into<String>) -> Self {
        let dependent = dependent.into();
        let dependency = dependency.into();
        Self {
            kind: ViolationKind::DependencyOrder,
            message: format!(
                "Expected dependency '{}' to come before '{}'.",
                dependency, dependent
            ),
            left: dependent,
            right: dependency,
            left_group: None,
            right_group: None,
            expected_newlines: None,
            actual_newlines: None,
        }
    }

    pub fn missing_spacing(
        left: impl Into<String>,
        right: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        let left = left.into();
        let right = right.into();
        Self {
            kind: ViolationKind::MissingSpacing,
            message: format!(
                "Expected {} blank line(s) between '{}' and '{}', found {}.",
                expected, left, right, actual
            ),
            left,
            right,
            left_group: None,
            right_group: None,
            expected_newlines: Some(expected),
            actual_newlines: Some(actual),
        }
    }

    pub fn extra_spacing(
        left: impl Into<String>,
        right: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        let left = left.into();
        let right = right.into();
        Self {
            kind: ViolationKind::ExtraSpacing,
            message: format!(
                "Expected {} blank line(s) between '{}' and '{}', found {}.",
                expected, left, right, actual
            ),
            left,
            right,
            left_group: None,
            right_group: None,
            expected_newlines: Some(expected),
            actual_newlines: Some(actual),
        }
    }

}

/// Collection of violations from one evaluation.
#[derive(Debug, Default)]
pub struct ViolationCollection {
    violations: Vec<Violation>,
}

impl ViolationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

impl IntoIterator for ViolationCollection {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

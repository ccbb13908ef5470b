//! The exhaustive mapping from Fetch condition operators to their web-query
//! comparison shapes.

use fetch_model::ConditionOperator;

use super::error::Error;

/// What a condition operator turns into on the web-query side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorMapping {
    /// A plain infix comparison (`eq`, `ne`, `lt`, …).
    Comparison(&'static str),
    /// A null test (`eq null` / `ne null`), taking no value.
    NullCheck { negated: bool },
    /// A SQL-style LIKE pattern; only prefix/suffix/contains shapes are
    /// expressible.
    Wildcard { negated: bool },
    /// A string function (`startswith`/`endswith`), optionally negated.
    StringFunction {
        function: &'static str,
        negated: bool,
    },
    /// A platform-defined query function with a declared arity.
    QueryFunction {
        function: &'static str,
        arity: FunctionArity,
        argument: ArgumentType,
    },
}

/// How many values a platform query function consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionArity {
    None,
    One,
    Two,
    Variadic,
}

/// How a platform query function's values are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    Text,
    WholeNumber,
}

/// The translation of every condition operator. Exhaustive by construction:
/// adding an operator without extending this table is a compile error.
pub fn mapping(operator: ConditionOperator) -> OperatorMapping {
    use ArgumentType::{Text, WholeNumber};
    use ConditionOperator as Op;
    use FunctionArity::{None, One, Two, Variadic};
    use OperatorMapping::{Comparison, NullCheck, QueryFunction, StringFunction, Wildcard};

    let function = |function, arity, argument| QueryFunction {
        function,
        arity,
        argument,
    };

    match operator {
        Op::Eq => Comparison("eq"),
        Op::Ne | Op::Neq => Comparison("ne"),
        Op::Lt => Comparison("lt"),
        Op::Le => Comparison("le"),
        Op::Gt => Comparison("gt"),
        Op::Ge => Comparison("ge"),

        Op::Null => NullCheck { negated: false },
        Op::NotNull => NullCheck { negated: true },

        Op::Like => Wildcard { negated: false },
        Op::NotLike => Wildcard { negated: true },

        Op::BeginsWith => StringFunction {
            function: "startswith",
            negated: false,
        },
        Op::NotBeginWith => StringFunction {
            function: "startswith",
            negated: true,
        },
        Op::EndsWith => StringFunction {
            function: "endswith",
            negated: false,
        },
        Op::NotEndWith => StringFunction {
            function: "endswith",
            negated: true,
        },

        Op::Above => function("Above", One, Text),
        Op::EqOrAbove => function("AboveOrEqual", One, Text),
        Op::Under => function("Under", One, Text),
        Op::EqOrUnder => function("UnderOrEqual", One, Text),
        Op::NotUnder => function("NotUnder", One, Text),

        Op::Between => function("Between", Variadic, Text),
        Op::NotBetween => function("NotBetween", Variadic, Text),
        Op::In => function("In", Variadic, Text),
        Op::NotIn => function("NotIn", Variadic, Text),
        Op::ContainValues => function("ContainValues", Variadic, Text),
        Op::NotContainValues => function("DoesNotContainValues", Variadic, Text),

        Op::EqBusinessId => function("EqualBusinessId", None, Text),
        Op::NeBusinessId => function("NotEqualBusinessId", None, Text),
        Op::EqUserId => function("EqualUserId", None, Text),
        Op::NeUserId => function("NotEqualUserId", None, Text),
        Op::EqUserLanguage => function("EqualUserLanguage", None, Text),
        Op::EqUserTeams => function("EqualUserTeams", None, Text),
        Op::EqUserOrUserTeams => function("EqualUserOrUserTeams", None, Text),
        Op::EqUserOrUserHierarchy => function("EqualUserOrUserHierarchy", None, Text),
        Op::EqUserOrUserHierarchyAndTeams => {
            function("EqualUserOrUserHierarchyAndTeams", None, Text)
        }

        Op::On => function("On", One, Text),
        Op::OnOrAfter => function("OnOrAfter", One, Text),
        Op::OnOrBefore => function("OnOrBefore", One, Text),

        Op::Yesterday => function("Yesterday", None, Text),
        Op::Today => function("Today", None, Text),
        Op::Tomorrow => function("Tomorrow", None, Text),

        Op::LastSevenDays => function("Last7Days", None, Text),
        Op::NextSevenDays => function("Next7Days", None, Text),
        Op::LastWeek => function("LastWeek", None, Text),
        Op::ThisWeek => function("ThisWeek", None, Text),
        Op::NextWeek => function("NextWeek", None, Text),
        Op::LastMonth => function("LastMonth", None, Text),
        Op::ThisMonth => function("ThisMonth", None, Text),
        Op::NextMonth => function("NextMonth", None, Text),
        Op::LastYear => function("LastYear", None, Text),
        Op::ThisYear => function("ThisYear", None, Text),
        Op::NextYear => function("NextYear", None, Text),

        Op::LastXHours => function("LastXHours", One, WholeNumber),
        Op::NextXHours => function("NextXHours", One, WholeNumber),
        Op::LastXDays => function("LastXDays", One, WholeNumber),
        Op::NextXDays => function("NextXDays", One, WholeNumber),
        Op::LastXWeeks => function("LastXWeeks", One, WholeNumber),
        Op::NextXWeeks => function("NextXWeeks", One, WholeNumber),
        Op::LastXMonths => function("LastXMonths", One, WholeNumber),
        Op::NextXMonths => function("NextXMonths", One, WholeNumber),
        Op::LastXYears => function("LastXYears", One, WholeNumber),
        Op::NextXYears => function("NextXYears", One, WholeNumber),

        Op::OlderThanXMinutes => function("OlderThanXMinutes", One, WholeNumber),
        Op::OlderThanXHours => function("OlderThanXHours", One, WholeNumber),
        Op::OlderThanXDays => function("OlderThanXDays", One, WholeNumber),
        Op::OlderThanXWeeks => function("OlderThanXWeeks", One, WholeNumber),
        Op::OlderThanXMonths => function("OlderThanXMonths", One, WholeNumber),
        Op::OlderThanXYears => function("OlderThanXYears", One, WholeNumber),

        Op::ThisFiscalYear => function("ThisFiscalYear", None, Text),
        Op::ThisFiscalPeriod => function("ThisFiscalPeriod", None, Text),
        Op::NextFiscalYear => function("NextFiscalYear", None, Text),
        Op::NextFiscalPeriod => function("NextFiscalPeriod", None, Text),
        Op::LastFiscalYear => function("LastFiscalYear", None, Text),
        Op::LastFiscalPeriod => function("LastFiscalPeriod", None, Text),
        Op::LastXFiscalPeriods => function("LastXFiscalPeriods", One, WholeNumber),
        Op::NextXFiscalPeriods => function("NextXFiscalPeriods", One, WholeNumber),
        Op::LastXFiscalYears => function("LastXFiscalYears", One, WholeNumber),
        Op::NextXFiscalYears => function("NextXFiscalYears", One, WholeNumber),
        Op::InFiscalYear => function("InFiscalYear", One, WholeNumber),
        Op::InFiscalPeriod => function("InFiscalPeriod", One, WholeNumber),
        Op::InFiscalPeriodAndYear => function("InFiscalPeriodAndYear", Two, WholeNumber),
        Op::InOrBeforeFiscalPeriodAndYear => {
            function("InOrBeforeFiscalPeriodAndYear", Two, WholeNumber)
        }
        Op::InOrAfterFiscalPeriodAndYear => {
            function("InOrAfterFiscalPeriodAndYear", Two, WholeNumber)
        }
    }
}

/// The logical negation of a plain comparison or null-check operator, used by
/// the `not any`/`not all` sign-pushing rewrite. Anything outside that set
/// has no defined negation and is reported as unsupported.
pub fn negate(operator: ConditionOperator) -> Result<ConditionOperator, Error> {
    use ConditionOperator as Op;

    match operator {
        Op::Eq => Ok(Op::Ne),
        Op::Ne | Op::Neq => Ok(Op::Eq),
        Op::Lt => Ok(Op::Ge),
        Op::Ge => Ok(Op::Lt),
        Op::Gt => Ok(Op::Le),
        Op::Le => Ok(Op::Gt),
        Op::Null => Ok(Op::NotNull),
        Op::NotNull => Ok(Op::Null),
        other => Err(Error::NotNegatable(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operator_has_a_mapping() {
        for operator in enum_iterator::all::<ConditionOperator>() {
            match mapping(operator) {
                OperatorMapping::Comparison(symbol) => assert!(!symbol.is_empty()),
                OperatorMapping::QueryFunction { function, .. }
                | OperatorMapping::StringFunction { function, .. } => {
                    assert!(!function.is_empty());
                }
                OperatorMapping::NullCheck { .. } | OperatorMapping::Wildcard { .. } => {}
            }
        }
    }

    #[test]
    fn negation_is_an_involution_on_the_comparison_set() {
        use ConditionOperator as Op;

        for operator in [Op::Eq, Op::Ne, Op::Lt, Op::Le, Op::Gt, Op::Ge, Op::Null, Op::NotNull] {
            let negated = negate(operator).unwrap();
            assert_eq!(negate(negated).unwrap(), operator);
        }

        // `neq` folds into the canonical `ne` spelling.
        assert_eq!(negate(Op::Neq).unwrap(), Op::Eq);

        assert_eq!(
            negate(Op::Like).unwrap_err(),
            Error::NotNegatable(Op::Like)
        );
    }
}

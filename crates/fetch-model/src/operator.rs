//! The condition operator set.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Every operator a Fetch condition can carry. The translation engine keeps an
/// exhaustive mapping table over this enum, so an unmapped operator is a
/// compile-time gap rather than a runtime surprise.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    enum_iterator::Sequence,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionOperator {
    Eq,
    Ne,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    Null,
    NotNull,
    BeginsWith,
    NotBeginWith,
    EndsWith,
    NotEndWith,
    On,
    OnOrBefore,
    OnOrAfter,
    Yesterday,
    Today,
    Tomorrow,
    LastSevenDays,
    NextSevenDays,
    LastWeek,
    ThisWeek,
    NextWeek,
    LastMonth,
    ThisMonth,
    NextMonth,
    LastYear,
    ThisYear,
    NextYear,
    LastXHours,
    NextXHours,
    LastXDays,
    NextXDays,
    LastXWeeks,
    NextXWeeks,
    LastXMonths,
    NextXMonths,
    LastXYears,
    NextXYears,
    LastXFiscalPeriods,
    NextXFiscalPeriods,
    LastXFiscalYears,
    NextXFiscalYears,
    #[serde(rename = "olderthan-x-minutes")]
    OlderThanXMinutes,
    #[serde(rename = "olderthan-x-hours")]
    OlderThanXHours,
    #[serde(rename = "olderthan-x-days")]
    OlderThanXDays,
    #[serde(rename = "olderthan-x-weeks")]
    OlderThanXWeeks,
    #[serde(rename = "olderthan-x-months")]
    OlderThanXMonths,
    #[serde(rename = "olderthan-x-years")]
    OlderThanXYears,
    #[serde(rename = "eq-businessid")]
    EqBusinessId,
    #[serde(rename = "ne-businessid")]
    NeBusinessId,
    #[serde(rename = "eq-userid")]
    EqUserId,
    #[serde(rename = "ne-userid")]
    NeUserId,
    #[serde(rename = "eq-userteams")]
    EqUserTeams,
    #[serde(rename = "eq-useroruserteams")]
    EqUserOrUserTeams,
    #[serde(rename = "eq-useroruserhierarchy")]
    EqUserOrUserHierarchy,
    #[serde(rename = "eq-useroruserhierarchyandteams")]
    EqUserOrUserHierarchyAndTeams,
    #[serde(rename = "eq-userlanguage")]
    EqUserLanguage,
    ThisFiscalYear,
    ThisFiscalPeriod,
    NextFiscalYear,
    NextFiscalPeriod,
    LastFiscalYear,
    LastFiscalPeriod,
    InFiscalYear,
    InFiscalPeriod,
    InFiscalPeriodAndYear,
    InOrBeforeFiscalPeriodAndYear,
    InOrAfterFiscalPeriodAndYear,
    Under,
    EqOrUnder,
    NotUnder,
    Above,
    EqOrAbove,
    ContainValues,
    NotContainValues,
}

impl ConditionOperator {
    /// The FetchXML wire name, for error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Neq => "neq",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Like => "like",
            Self::NotLike => "not-like",
            Self::In => "in",
            Self::NotIn => "not-in",
            Self::Between => "between",
            Self::NotBetween => "not-between",
            Self::Null => "null",
            Self::NotNull => "not-null",
            Self::BeginsWith => "begins-with",
            Self::NotBeginWith => "not-begin-with",
            Self::EndsWith => "ends-with",
            Self::NotEndWith => "not-end-with",
            Self::On => "on",
            Self::OnOrBefore => "on-or-before",
            Self::OnOrAfter => "on-or-after",
            Self::Yesterday => "yesterday",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::LastSevenDays => "last-seven-days",
            Self::NextSevenDays => "next-seven-days",
            Self::LastWeek => "last-week",
            Self::ThisWeek => "this-week",
            Self::NextWeek => "next-week",
            Self::LastMonth => "last-month",
            Self::ThisMonth => "this-month",
            Self::NextMonth => "next-month",
            Self::LastYear => "last-year",
            Self::ThisYear => "this-year",
            Self::NextYear => "next-year",
            Self::LastXHours => "last-x-hours",
            Self::NextXHours => "next-x-hours",
            Self::LastXDays => "last-x-days",
            Self::NextXDays => "next-x-days",
            Self::LastXWeeks => "last-x-weeks",
            Self::NextXWeeks => "next-x-weeks",
            Self::LastXMonths => "last-x-months",
            Self::NextXMonths => "next-x-months",
            Self::LastXYears => "last-x-years",
            Self::NextXYears => "next-x-years",
            Self::LastXFiscalPeriods => "last-x-fiscal-periods",
            Self::NextXFiscalPeriods => "next-x-fiscal-periods",
            Self::LastXFiscalYears => "last-x-fiscal-years",
            Self::NextXFiscalYears => "next-x-fiscal-years",
            Self::OlderThanXMinutes => "olderthan-x-minutes",
            Self::OlderThanXHours => "olderthan-x-hours",
            Self::OlderThanXDays => "olderthan-x-days",
            Self::OlderThanXWeeks => "olderthan-x-weeks",
            Self::OlderThanXMonths => "olderthan-x-months",
            Self::OlderThanXYears => "olderthan-x-years",
            Self::EqBusinessId => "eq-businessid",
            Self::NeBusinessId => "ne-businessid",
            Self::EqUserId => "eq-userid",
            Self::NeUserId => "ne-userid",
            Self::EqUserTeams => "eq-userteams",
            Self::EqUserOrUserTeams => "eq-useroruserteams",
            Self::EqUserOrUserHierarchy => "eq-useroruserhierarchy",
            Self::EqUserOrUserHierarchyAndTeams => "eq-useroruserhierarchyandteams",
            Self::EqUserLanguage => "eq-userlanguage",
            Self::ThisFiscalYear => "this-fiscal-year",
            Self::ThisFiscalPeriod => "this-fiscal-period",
            Self::NextFiscalYear => "next-fiscal-year",
            Self::NextFiscalPeriod => "next-fiscal-period",
            Self::LastFiscalYear => "last-fiscal-year",
            Self::LastFiscalPeriod => "last-fiscal-period",
            Self::InFiscalYear => "in-fiscal-year",
            Self::InFiscalPeriod => "in-fiscal-period",
            Self::InFiscalPeriodAndYear => "in-fiscal-period-and-year",
            Self::InOrBeforeFiscalPeriodAndYear => "in-or-before-fiscal-period-and-year",
            Self::InOrAfterFiscalPeriodAndYear => "in-or-after-fiscal-period-and-year",
            Self::Under => "under",
            Self::EqOrUnder => "eq-or-under",
            Self::NotUnder => "not-under",
            Self::Above => "above",
            Self::EqOrAbove => "eq-or-above",
            Self::ContainValues => "contain-values",
            Self::NotContainValues => "not-contain-values",
        }
    }
}

impl std::fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

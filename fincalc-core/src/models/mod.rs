mod canada;
mod country;
mod filing_status;
mod india;
mod investment;
mod tax_bracket;
mod tax_result;
mod tax_tables;
mod usa;

pub use canada::{
    CanadaDeduction, CanadaDeductionCaps, CanadaProfile, CanadaTaxBreakdown, CanadaTaxInput,
    CppRules, DeductionMethod, EiRules, RrspRules,
};
pub use country::Country;
pub use filing_status::{FilingStatus, FilingStatusTable};
pub use india::{
    AgeBracket, BasicExemptions, IndiaDeduction, IndiaDeductionCaps, IndiaProfile,
    IndiaTaxBreakdown, IndiaTaxInput, RegimeRules, SurchargeTier, TaxRegime,
};
pub use investment::{
    ContributionPlan, InvestmentResult, InvestmentScenario, MAX_HORIZON_YEARS, ProjectionYear,
};
pub use tax_bracket::TaxBracket;
pub use tax_result::{TaxBreakdown, TaxComputationInput, TaxComputationResult};
pub use tax_tables::{ScheduleError, TaxTables};
pub use usa::{UsaCredit, UsaCreditCaps, UsaDeduction, UsaProfile, UsaTaxBreakdown, UsaTaxInput};

//! Compiled-in tax tables.
//!
//! | Country | Year       | Regions |
//! |---------|------------|---------|
//! | India   | FY 2024-25 | -       |
//! | Canada  | 2024       | AB, BC, MB, NS, ON, QC, SK |
//! | USA     | 2023       | CA, CO, FL, IL, MA, NY, PA, TX, WA |

use std::collections::BTreeMap;

use async_trait::async_trait;
use fincalc_core::tables::{
    InMemoryRepository, RepositoryError, RepositoryFactory, TableSourceConfig, TaxTableRepository,
};
use fincalc_core::{
    BasicExemptions, CanadaDeductionCaps, CanadaProfile, CppRules, EiRules, FilingStatusTable,
    IndiaDeductionCaps, IndiaProfile, RegimeRules, RrspRules, SurchargeTier, TaxBracket,
    TaxTables, UsaCreditCaps, UsaProfile,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Builds a contiguous schedule from `(upper_bound, rate)` pairs followed by
/// the open-ended top rate.
fn schedule(
    bounded: &[(Decimal, Decimal)],
    top_rate: Decimal,
) -> Vec<TaxBracket> {
    let mut brackets = Vec::with_capacity(bounded.len() + 1);
    let mut min_income = Decimal::ZERO;
    for &(max_income, rate) in bounded {
        brackets.push(TaxBracket::bounded(min_income, max_income, rate));
        min_income = max_income;
    }
    brackets.push(TaxBracket::unbounded(min_income, top_rate));
    brackets
}

fn flat(rate: Decimal) -> Vec<TaxBracket> {
    schedule(&[], rate)
}

fn surcharge_tiers(rates: [Decimal; 4]) -> Vec<SurchargeTier> {
    [dec!(5000000), dec!(10000000), dec!(20000000), dec!(50000000)]
        .into_iter()
        .zip(rates)
        .map(|(threshold, rate)| SurchargeTier { threshold, rate })
        .collect()
}

pub fn india_fy2024_25() -> IndiaProfile {
    IndiaProfile {
        tax_year: "FY2024-25".to_string(),
        old_regime: RegimeRules {
            brackets: schedule(
                &[
                    (dec!(250000), dec!(0)),
                    (dec!(500000), dec!(0.05)),
                    (dec!(1000000), dec!(0.20)),
                ],
                dec!(0.30),
            ),
            standard_deduction: dec!(50000),
            rebate_threshold: dec!(500000),
            surcharge_tiers: surcharge_tiers([dec!(0.10), dec!(0.15), dec!(0.25), dec!(0.37)]),
        },
        new_regime: RegimeRules {
            brackets: schedule(
                &[
                    (dec!(300000), dec!(0)),
                    (dec!(700000), dec!(0.05)),
                    (dec!(1000000), dec!(0.10)),
                    (dec!(1200000), dec!(0.15)),
                    (dec!(1500000), dec!(0.20)),
                ],
                dec!(0.30),
            ),
            standard_deduction: dec!(75000),
            rebate_threshold: dec!(700000),
            surcharge_tiers: surcharge_tiers([dec!(0.10), dec!(0.15), dec!(0.25), dec!(0.25)]),
        },
        basic_exemption: BasicExemptions {
            below_sixty: dec!(250000),
            senior: dec!(300000),
            super_senior: dec!(500000),
        },
        deduction_caps: IndiaDeductionCaps {
            section_80c: Some(dec!(150000)),
            nps_80ccd_1b: Some(dec!(50000)),
            health_insurance_80d: Some(dec!(25000)),
            health_insurance_80d_senior: Some(dec!(50000)),
            home_loan_interest_24b: Some(dec!(200000)),
            education_loan_80e: None,
        },
        cess_rate: dec!(0.04),
        short_term_capital_gains_rate: dec!(0.20),
        long_term_capital_gains_rate: dec!(0.125),
        long_term_capital_gains_exemption: dec!(125000),
    }
}

pub fn canada_2024() -> CanadaProfile {
    let provincial = BTreeMap::from([
        (
            "AB".to_string(),
            schedule(
                &[
                    (dec!(148269), dec!(0.10)),
                    (dec!(177922), dec!(0.12)),
                    (dec!(237230), dec!(0.13)),
                    (dec!(355845), dec!(0.14)),
                ],
                dec!(0.15),
            ),
        ),
        (
            "BC".to_string(),
            schedule(
                &[
                    (dec!(47937), dec!(0.0506)),
                    (dec!(95875), dec!(0.077)),
                    (dec!(110076), dec!(0.105)),
                    (dec!(133664), dec!(0.1229)),
                    (dec!(181232), dec!(0.147)),
                    (dec!(252752), dec!(0.168)),
                ],
                dec!(0.205),
            ),
        ),
        (
            "MB".to_string(),
            schedule(
                &[(dec!(47000), dec!(0.108)), (dec!(100000), dec!(0.1275))],
                dec!(0.174),
            ),
        ),
        (
            "NS".to_string(),
            schedule(
                &[
                    (dec!(29590), dec!(0.0879)),
                    (dec!(59180), dec!(0.1495)),
                    (dec!(93000), dec!(0.1667)),
                    (dec!(150000), dec!(0.175)),
                ],
                dec!(0.21),
            ),
        ),
        (
            "ON".to_string(),
            schedule(
                &[
                    (dec!(51446), dec!(0.0505)),
                    (dec!(102894), dec!(0.0915)),
                    (dec!(150000), dec!(0.1116)),
                    (dec!(220000), dec!(0.1216)),
                ],
                dec!(0.1316),
            ),
        ),
        (
            "QC".to_string(),
            schedule(
                &[
                    (dec!(51780), dec!(0.14)),
                    (dec!(103545), dec!(0.19)),
                    (dec!(126000), dec!(0.24)),
                ],
                dec!(0.2575),
            ),
        ),
        (
            "SK".to_string(),
            schedule(
                &[(dec!(52057), dec!(0.105)), (dec!(148734), dec!(0.125))],
                dec!(0.145),
            ),
        ),
    ]);

    CanadaProfile {
        tax_year: 2024,
        federal: schedule(
            &[
                (dec!(55867), dec!(0.15)),
                (dec!(111733), dec!(0.205)),
                (dec!(173205), dec!(0.26)),
                (dec!(246752), dec!(0.29)),
            ],
            dec!(0.33),
        ),
        provincial,
        cpp: CppRules {
            basic_exemption: dec!(3500),
            max_pensionable_earnings: dec!(68500),
            contribution_rate: dec!(0.0595),
        },
        ei: EiRules {
            max_insurable_earnings: dec!(63200),
            premium_rate: dec!(0.0166),
        },
        rrsp: RrspRules {
            dollar_limit: dec!(31560),
            earned_income_rate: dec!(0.18),
        },
        capital_gains_inclusion_rate: dec!(0.5),
        eligible_dividend_gross_up: dec!(1.38),
        deduction_caps: CanadaDeductionCaps {
            child_care: Some(dec!(8000)),
            ..Default::default()
        },
    }
}

/// 10% through 35% bounds for one filing status; the top rate is 37%.
fn us_federal(bounds: [Decimal; 6]) -> Vec<TaxBracket> {
    let rates = [
        dec!(0.10),
        dec!(0.12),
        dec!(0.22),
        dec!(0.24),
        dec!(0.32),
        dec!(0.35),
    ];
    let pairs: Vec<_> = bounds.into_iter().zip(rates).collect();
    schedule(&pairs, dec!(0.37))
}

fn us_ltcg(
    zero_rate_max: Decimal,
    fifteen_rate_max: Decimal,
) -> Vec<TaxBracket> {
    schedule(
        &[(zero_rate_max, dec!(0)), (fifteen_rate_max, dec!(0.15))],
        dec!(0.20),
    )
}

pub fn usa_2023() -> UsaProfile {
    let state = BTreeMap::from([
        (
            "CA".to_string(),
            schedule(
                &[
                    (dec!(10412), dec!(0.01)),
                    (dec!(24684), dec!(0.02)),
                    (dec!(38959), dec!(0.04)),
                    (dec!(54081), dec!(0.06)),
                    (dec!(68350), dec!(0.08)),
                    (dec!(349137), dec!(0.093)),
                    (dec!(418961), dec!(0.103)),
                    (dec!(698271), dec!(0.113)),
                ],
                dec!(0.123),
            ),
        ),
        ("CO".to_string(), flat(dec!(0.044))),
        ("FL".to_string(), flat(dec!(0))),
        ("IL".to_string(), flat(dec!(0.0495))),
        (
            "MA".to_string(),
            schedule(&[(dec!(1000000), dec!(0.05))], dec!(0.09)),
        ),
        (
            "NY".to_string(),
            schedule(
                &[
                    (dec!(8500), dec!(0.04)),
                    (dec!(11700), dec!(0.045)),
                    (dec!(13900), dec!(0.0525)),
                    (dec!(80650), dec!(0.055)),
                    (dec!(215400), dec!(0.06)),
                    (dec!(1077550), dec!(0.0685)),
                    (dec!(5000000), dec!(0.0965)),
                    (dec!(25000000), dec!(0.103)),
                ],
                dec!(0.109),
            ),
        ),
        ("PA".to_string(), flat(dec!(0.0307))),
        ("TX".to_string(), flat(dec!(0))),
        ("WA".to_string(), flat(dec!(0))),
    ]);

    UsaProfile {
        tax_year: 2023,
        federal: FilingStatusTable {
            single: us_federal([
                dec!(11000),
                dec!(44725),
                dec!(95375),
                dec!(182100),
                dec!(231250),
                dec!(578125),
            ]),
            married_filing_jointly: us_federal([
                dec!(22000),
                dec!(89450),
                dec!(190750),
                dec!(364200),
                dec!(462500),
                dec!(693750),
            ]),
            married_filing_separately: us_federal([
                dec!(11000),
                dec!(44725),
                dec!(95375),
                dec!(182100),
                dec!(231250),
                dec!(346875),
            ]),
            head_of_household: us_federal([
                dec!(15700),
                dec!(59850),
                dec!(95350),
                dec!(182100),
                dec!(231250),
                dec!(578100),
            ]),
        },
        standard_deduction: FilingStatusTable {
            single: dec!(13850),
            married_filing_jointly: dec!(27700),
            married_filing_separately: dec!(13850),
            head_of_household: dec!(20800),
        },
        additional_standard_deduction: FilingStatusTable {
            single: dec!(1850),
            married_filing_jointly: dec!(1500),
            married_filing_separately: dec!(1500),
            head_of_household: dec!(1850),
        },
        long_term_capital_gains: FilingStatusTable {
            single: us_ltcg(dec!(44625), dec!(492300)),
            married_filing_jointly: us_ltcg(dec!(89250), dec!(553850)),
            married_filing_separately: us_ltcg(dec!(44625), dec!(276900)),
            head_of_household: us_ltcg(dec!(59750), dec!(523050)),
        },
        state,
        salt_cap: FilingStatusTable {
            single: dec!(10000),
            married_filing_jointly: dec!(10000),
            married_filing_separately: dec!(5000),
            head_of_household: dec!(10000),
        },
        medical_expense_floor_rate: dec!(0.075),
        credit_caps: UsaCreditCaps {
            dependent_care: Some(dec!(2100)),
            education: Some(dec!(2500)),
            ..Default::default()
        },
    }
}

/// All three built-in profiles.
pub fn builtin_tables() -> TaxTables {
    TaxTables {
        india: Some(india_fy2024_25()),
        canada: Some(canada_2024()),
        usa: Some(usa_2023()),
    }
}

/// Serves [`builtin_tables`]; `location` is ignored.
pub struct BuiltinFactory;

#[async_trait]
impl RepositoryFactory for BuiltinFactory {
    fn backend_name(&self) -> &'static str {
        "builtin"
    }

    async fn create(
        &self,
        _config: &TableSourceConfig,
    ) -> Result<Box<dyn TaxTableRepository>, RepositoryError> {
        Ok(Box::new(InMemoryRepository::new(builtin_tables())))
    }
}

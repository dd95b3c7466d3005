//! Rate tables shared by the unit tests in this crate.
//!
//! These mirror the published figures closely enough to hand-check results;
//! the authoritative copies live in `fincalc-data`.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;

use crate::models::*;

pub(crate) fn india_profile() -> IndiaProfile {
    IndiaProfile {
        tax_year: "FY2024-25".to_string(),
        old_regime: RegimeRules {
            brackets: vec![
                TaxBracket::bounded(dec!(0), dec!(250000), dec!(0)),
                TaxBracket::bounded(dec!(250000), dec!(500000), dec!(0.05)),
                TaxBracket::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
                TaxBracket::unbounded(dec!(1000000), dec!(0.30)),
            ],
            standard_deduction: dec!(50000),
            rebate_threshold: dec!(500000),
            surcharge_tiers: surcharge_tiers(dec!(0.37)),
        },
        new_regime: RegimeRules {
            brackets: vec![
                TaxBracket::bounded(dec!(0), dec!(300000), dec!(0)),
                TaxBracket::bounded(dec!(300000), dec!(700000), dec!(0.05)),
                TaxBracket::bounded(dec!(700000), dec!(1000000), dec!(0.10)),
                TaxBracket::bounded(dec!(1000000), dec!(1200000), dec!(0.15)),
                TaxBracket::bounded(dec!(1200000), dec!(1500000), dec!(0.20)),
                TaxBracket::unbounded(dec!(1500000), dec!(0.30)),
            ],
            standard_deduction: dec!(75000),
            rebate_threshold: dec!(700000),
            surcharge_tiers: surcharge_tiers(dec!(0.25)),
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

fn surcharge_tiers(top_rate: rust_decimal::Decimal) -> Vec<SurchargeTier> {
    vec![
        SurchargeTier {
            threshold: dec!(5000000),
            rate: dec!(0.10),
        },
        SurchargeTier {
            threshold: dec!(10000000),
            rate: dec!(0.15),
        },
        SurchargeTier {
            threshold: dec!(20000000),
            rate: dec!(0.25),
        },
        SurchargeTier {
            threshold: dec!(50000000),
            rate: top_rate,
        },
    ]
}

pub(crate) fn canada_profile() -> CanadaProfile {
    CanadaProfile {
        tax_year: 2024,
        federal: vec![
            TaxBracket::bounded(dec!(0), dec!(55867), dec!(0.15)),
            TaxBracket::bounded(dec!(55867), dec!(111733), dec!(0.205)),
            TaxBracket::bounded(dec!(111733), dec!(173205), dec!(0.26)),
            TaxBracket::bounded(dec!(173205), dec!(246752), dec!(0.29)),
            TaxBracket::unbounded(dec!(246752), dec!(0.33)),
        ],
        provincial: BTreeMap::from([
            (
                "AB".to_string(),
                vec![
                    TaxBracket::bounded(dec!(0), dec!(148269), dec!(0.10)),
                    TaxBracket::bounded(dec!(148269), dec!(177922), dec!(0.12)),
                    TaxBracket::bounded(dec!(177922), dec!(237230), dec!(0.13)),
                    TaxBracket::bounded(dec!(237230), dec!(355845), dec!(0.14)),
                    TaxBracket::unbounded(dec!(355845), dec!(0.15)),
                ],
            ),
            (
                "ON".to_string(),
                vec![
                    TaxBracket::bounded(dec!(0), dec!(51446), dec!(0.0505)),
                    TaxBracket::bounded(dec!(51446), dec!(102894), dec!(0.0915)),
                    TaxBracket::bounded(dec!(102894), dec!(150000), dec!(0.1116)),
                    TaxBracket::bounded(dec!(150000), dec!(220000), dec!(0.1216)),
                    TaxBracket::unbounded(dec!(220000), dec!(0.1316)),
                ],
            ),
        ]),
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

pub(crate) fn usa_profile() -> UsaProfile {
    UsaProfile {
        tax_year: 2023,
        federal: FilingStatusTable {
            single: us_federal(&[
                dec!(11000),
                dec!(44725),
                dec!(95375),
                dec!(182100),
                dec!(231250),
                dec!(578125),
            ]),
            married_filing_jointly: us_federal(&[
                dec!(22000),
                dec!(89450),
                dec!(190750),
                dec!(364200),
                dec!(462500),
                dec!(693750),
            ]),
            married_filing_separately: us_federal(&[
                dec!(11000),
                dec!(44725),
                dec!(95375),
                dec!(182100),
                dec!(231250),
                dec!(346875),
            ]),
            head_of_household: us_federal(&[
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
        state: BTreeMap::from([
            (
                "NY".to_string(),
                vec![
                    TaxBracket::bounded(dec!(0), dec!(8500), dec!(0.04)),
                    TaxBracket::bounded(dec!(8500), dec!(11700), dec!(0.045)),
                    TaxBracket::bounded(dec!(11700), dec!(13900), dec!(0.0525)),
                    TaxBracket::bounded(dec!(13900), dec!(80650), dec!(0.055)),
                    TaxBracket::bounded(dec!(80650), dec!(215400), dec!(0.06)),
                    TaxBracket::bounded(dec!(215400), dec!(1077550), dec!(0.0685)),
                    TaxBracket::bounded(dec!(1077550), dec!(5000000), dec!(0.0965)),
                    TaxBracket::bounded(dec!(5000000), dec!(25000000), dec!(0.103)),
                    TaxBracket::unbounded(dec!(25000000), dec!(0.109)),
                ],
            ),
            (
                "TX".to_string(),
                vec![TaxBracket::unbounded(dec!(0), dec!(0))],
            ),
        ]),
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

fn us_federal(bounds: &[rust_decimal::Decimal; 6]) -> Vec<TaxBracket> {
    let rates = [
        dec!(0.10),
        dec!(0.12),
        dec!(0.22),
        dec!(0.24),
        dec!(0.32),
        dec!(0.35),
        dec!(0.37),
    ];
    let mut brackets = Vec::with_capacity(rates.len());
    let mut min = dec!(0);
    for (max, rate) in bounds.iter().zip(rates) {
        brackets.push(TaxBracket::bounded(min, *max, rate));
        min = *max;
    }
    brackets.push(TaxBracket::unbounded(min, rates[6]));
    brackets
}

fn us_ltcg(
    zero_rate_max: rust_decimal::Decimal,
    fifteen_rate_max: rust_decimal::Decimal,
) -> Vec<TaxBracket> {
    vec![
        TaxBracket::bounded(dec!(0), zero_rate_max, dec!(0)),
        TaxBracket::bounded(zero_rate_max, fifteen_rate_max, dec!(0.15)),
        TaxBracket::unbounded(fifteen_rate_max, dec!(0.20)),
    ]
}

pub(crate) fn tax_tables() -> TaxTables {
    TaxTables {
        india: Some(india_profile()),
        canada: Some(canada_profile()),
        usa: Some(usa_profile()),
    }
}

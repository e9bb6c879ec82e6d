use serde::{Deserialize, Serialize};

use super::grade::Grade;

/// The ten qualitative attributes graded on every assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueDriver {
    FinancialPerformance,
    GrowthPotential,
    RecurringRevenue,
    CustomerConcentration,
    ManagementTeam,
    OwnerDependence,
    CompetitivePosition,
    OperationalSystems,
    MarketConditions,
    CustomerSatisfaction,
}

impl ValueDriver {
    /// All drivers in their persisted order.
    pub const ALL: [ValueDriver; 10] = [
        ValueDriver::FinancialPerformance,
        ValueDriver::GrowthPotential,
        ValueDriver::RecurringRevenue,
        ValueDriver::CustomerConcentration,
        ValueDriver::ManagementTeam,
        ValueDriver::OwnerDependence,
        ValueDriver::CompetitivePosition,
        ValueDriver::OperationalSystems,
        ValueDriver::MarketConditions,
        ValueDriver::CustomerSatisfaction,
    ];

    /// Field name used by the intake form and the persisted schema.
    pub fn field_name(self) -> &'static str {
        match self {
            ValueDriver::FinancialPerformance => "financialPerformance",
            ValueDriver::GrowthPotential => "growthPotential",
            ValueDriver::RecurringRevenue => "recurringRevenue",
            ValueDriver::CustomerConcentration => "customerConcentration",
            ValueDriver::ManagementTeam => "managementTeam",
            ValueDriver::OwnerDependence => "ownerDependence",
            ValueDriver::CompetitivePosition => "competitivePosition",
            ValueDriver::OperationalSystems => "operationalSystems",
            ValueDriver::MarketConditions => "marketConditions",
            ValueDriver::CustomerSatisfaction => "customerSatisfaction",
        }
    }
}

impl std::fmt::Display for ValueDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ValueDriver::FinancialPerformance => "Financial Performance",
            ValueDriver::GrowthPotential => "Growth Potential",
            ValueDriver::RecurringRevenue => "Recurring Revenue",
            ValueDriver::CustomerConcentration => "Customer Concentration",
            ValueDriver::ManagementTeam => "Management Team",
            ValueDriver::OwnerDependence => "Owner Dependence",
            ValueDriver::CompetitivePosition => "Competitive Position",
            ValueDriver::OperationalSystems => "Operational Systems",
            ValueDriver::MarketConditions => "Market Conditions",
            ValueDriver::CustomerSatisfaction => "Customer Satisfaction",
        };
        f.write_str(label)
    }
}

/// A complete set of ten value-driver grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDriverGrades {
    pub financial_performance: Grade,
    pub growth_potential: Grade,
    pub recurring_revenue: Grade,
    pub customer_concentration: Grade,
    pub management_team: Grade,
    pub owner_dependence: Grade,
    pub competitive_position: Grade,
    pub operational_systems: Grade,
    pub market_conditions: Grade,
    pub customer_satisfaction: Grade,
}

impl ValueDriverGrades {
    /// Same grade for every driver.
    pub fn uniform(grade: Grade) -> Self {
        Self::from_array([grade; 10])
    }

    /// Grades in `ValueDriver::ALL` order.
    pub fn from_array(g: [Grade; 10]) -> Self {
        ValueDriverGrades {
            financial_performance: g[0],
            growth_potential: g[1],
            recurring_revenue: g[2],
            customer_concentration: g[3],
            management_team: g[4],
            owner_dependence: g[5],
            competitive_position: g[6],
            operational_systems: g[7],
            market_conditions: g[8],
            customer_satisfaction: g[9],
        }
    }

    pub fn to_array(&self) -> [Grade; 10] {
        [
            self.financial_performance,
            self.growth_potential,
            self.recurring_revenue,
            self.customer_concentration,
            self.management_team,
            self.owner_dependence,
            self.competitive_position,
            self.operational_systems,
            self.market_conditions,
            self.customer_satisfaction,
        ]
    }

    pub fn get(&self, driver: ValueDriver) -> Grade {
        match driver {
            ValueDriver::FinancialPerformance => self.financial_performance,
            ValueDriver::GrowthPotential => self.growth_potential,
            ValueDriver::RecurringRevenue => self.recurring_revenue,
            ValueDriver::CustomerConcentration => self.customer_concentration,
            ValueDriver::ManagementTeam => self.management_team,
            ValueDriver::OwnerDependence => self.owner_dependence,
            ValueDriver::CompetitivePosition => self.competitive_position,
            ValueDriver::OperationalSystems => self.operational_systems,
            ValueDriver::MarketConditions => self.market_conditions,
            ValueDriver::CustomerSatisfaction => self.customer_satisfaction,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ValueDriver, Grade)> + '_ {
        ValueDriver::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

//! 시나리오 모델: 입력, 파생 출력, 저장.

pub mod inputs;
pub mod outputs;
pub mod store;

pub use inputs::{
    Acquisition, AcquisitionStrategy, BenefitCategory, BenefitEntry, CostItem, DebtKind,
    DebtParams, Remediation, ScenarioInputs, StepMinutes, VolumeInputs, WorkflowMinutes,
    WorkflowStep, MAX_YEARS,
};
pub use outputs::{compute_many, Scenario, ScenarioOutputs, SCHEMA_VERSION};
pub use store::{Discrepancy, LoadPolicy, LoadedScenario, StoreError};

mod common;

use automation_business_case::finance::{
    self, cumulative_at, irr, npv, payback_period, IrrSolver, Metric, UndefinedReason,
};
use automation_business_case::scenario::Scenario;
use common::{assert_close, example_inputs};

#[test]
fn example_scenario_metrics() {
    let scenario = Scenario::compute(example_inputs()).expect("example scenario");
    let o = &scenario.outputs;
    assert_eq!(o.cash_flows.len(), 6);
    assert_close(o.cash_flows[0], -50_000.0, 1e-9);
    for cf in &o.cash_flows[1..] {
        assert_close(*cf, 110_000.0, 1e-6);
    }
    assert_close(o.npv, 366_986.54, 0.01);

    let rate = o.irr.value().expect("irr defined");
    assert!(rate > 1.0, "irr={rate}");
    let at_irr = npv(rate, &o.cash_flows).unwrap();
    assert!(at_irr.abs() < 1e-3, "npv(irr)={at_irr}");

    assert_close(o.payback.value().expect("payback defined"), 50_000.0 / 110_000.0, 1e-9);
    assert_close(o.cum_1.value().unwrap(), 60_000.0, 1e-6);
    assert_close(o.cum_3.value().unwrap(), 280_000.0, 1e-6);
    assert_close(o.cum_5.value().unwrap(), 500_000.0, 1e-6);
}

#[test]
fn per_unit_sanity_values_use_scope() {
    let o = Scenario::compute(example_inputs()).unwrap().outputs;
    assert_eq!(o.total_switches, 2_500);
    assert_close(o.hours_saved_per_switch_per_year.value().unwrap(), 0.64, 1e-9);
    assert_close(o.hours_saved_per_site_per_year.value().unwrap(), 6.4, 1e-9);
    assert_close(o.benefit_per_switch_per_year.value().unwrap(), 48.0, 1e-9);
    assert_close(o.benefit_per_site_per_year.value().unwrap(), 480.0, 1e-9);
    assert_close(o.benefit_per_change.value().unwrap(), 100.0, 1e-9);
}

#[test]
fn zero_scope_leaves_per_unit_values_undefined() {
    let undefined = Metric::Undefined(UndefinedReason::NotMeaningful);

    let mut inputs = example_inputs();
    inputs.volume.switches_per_location = 0;
    let o = Scenario::compute(inputs).unwrap().outputs;
    assert_eq!(o.total_switches, 0);
    assert_eq!(o.hours_saved_per_switch_per_year, undefined);
    assert_eq!(o.benefit_per_switch_per_year, undefined);
    assert!(o.hours_saved_per_site_per_year.is_defined());
    assert!(o.benefit_per_site_per_year.is_defined());

    let mut inputs = example_inputs();
    inputs.volume.num_locations = 0;
    inputs.volume.changes_per_month = 0.0;
    let o = Scenario::compute(inputs).unwrap().outputs;
    assert_eq!(o.hours_saved_per_site_per_year, undefined);
    assert_eq!(o.benefit_per_site_per_year, undefined);
    assert_eq!(o.benefit_per_change, undefined);
    assert_eq!(o.hours_saved_per_switch_per_year, undefined);
}

#[test]
fn small_cash_flows_solve_to_exact_irr() {
    let rate = irr(&[-1e-6, 2e-6], &IrrSolver::default())
        .value()
        .expect("irr defined");
    assert_close(rate, 1.0, 1e-6);
    assert!(npv(rate, &[-1e-6, 2e-6]).unwrap().abs() < 1e-12);
}

#[test]
fn npv_at_zero_is_plain_sum() {
    let flows = [-1_000.0, 300.0, 400.0, 500.0];
    assert_eq!(npv(0.0, &flows).unwrap(), flows.iter().sum::<f64>());
}

#[test]
fn npv_discounts_from_year_one() {
    let value = npv(0.10, &[-100.0, 110.0]).unwrap();
    assert_close(value, 0.0, 1e-12);
}

#[test]
fn irr_of_simple_doubling() {
    let rate = irr(&[-100.0, 200.0], &IrrSolver::default());
    assert_close(rate.value().unwrap(), 1.0, 1e-6);
}

#[test]
fn irr_undefined_without_sign_change() {
    let solver = IrrSolver::default();
    assert_eq!(
        irr(&[10.0, 20.0, 30.0], &solver),
        Metric::Undefined(UndefinedReason::NotMeaningful)
    );
    assert_eq!(
        irr(&[-10.0, -20.0], &solver),
        Metric::Undefined(UndefinedReason::NotMeaningful)
    );
    assert_eq!(
        irr(&[0.0, 0.0, 0.0], &solver),
        Metric::Undefined(UndefinedReason::NotMeaningful)
    );
}

#[test]
fn irr_picks_up_negative_rates() {
    // 100 투자 후 2년간 45씩 회수: IRR < 0
    let rate = irr(&[-100.0, 45.0, 45.0], &IrrSolver::default())
        .value()
        .expect("irr defined");
    assert!(rate < 0.0 && rate > -0.2, "irr={rate}");
    assert_close(npv(rate, &[-100.0, 45.0, 45.0]).unwrap(), 0.0, 1e-6);
}

#[test]
fn payback_interpolates_within_year() {
    let p = payback_period(&[-100.0, 40.0, 40.0, 40.0]);
    assert_close(p.value().unwrap(), 2.5, 1e-12);
}

#[test]
fn payback_exact_on_year_boundary() {
    let p = payback_period(&[-100.0, 50.0, 50.0]);
    assert_eq!(p, Metric::Defined(2.0));
}

#[test]
fn payback_not_reached_within_horizon() {
    assert_eq!(
        payback_period(&[-100.0, 10.0, 10.0]),
        Metric::Undefined(UndefinedReason::NotReached)
    );
}

#[test]
fn checkpoints_beyond_horizon_are_undefined() {
    let flows = [-100.0, 60.0, 60.0];
    assert_eq!(cumulative_at(&flows, 1), Metric::Defined(-40.0));
    assert_eq!(
        cumulative_at(&flows, 3),
        Metric::Undefined(UndefinedReason::BeyondHorizon)
    );
    let m = finance::compute(&flows, 0.1).unwrap();
    assert_eq!(m.cum_5, Metric::Undefined(UndefinedReason::BeyondHorizon));
}

#[test]
fn discount_rate_at_minus_one_is_rejected() {
    assert!(finance::compute(&[-1.0, 2.0], -1.0).is_err());
}

#[test]
fn zero_discount_rate_is_allowed() {
    let m = finance::compute(&[-100.0, 60.0, 60.0], 0.0).unwrap();
    assert_eq!(m.npv, 20.0);
}

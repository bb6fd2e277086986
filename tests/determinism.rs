mod common;

use common::{loss_and_gradients, regression_data, seeded_layer};
use rtorch_optim::nn::{GradientSet, Linear, Parameterized};
use rtorch_optim::optim::{AdamConfig, Optimizer, OptimizerSpec, RmsPropConfig, SgdConfig};
use rtorch_optim::utils::serialization::{self, to_bytes};

fn trajectory(spec: OptimizerSpec, steps: usize) -> Vec<Vec<u8>> {
    let (inputs, targets) = regression_data();
    let mut layer = seeded_layer(11);
    let mut optimizer: Box<dyn Optimizer<Linear, Gradient = GradientSet>> = spec.build(&layer).unwrap();
    let mut snapshots = vec![to_bytes(layer.parameters()).unwrap()];
    for _ in 0..steps {
        let (_, grads) = loss_and_gradients(&layer, &inputs, &targets);
        optimizer.fit(&mut layer, &grads);
        snapshots.push(to_bytes(layer.parameters()).unwrap());
    }
    snapshots
}

#[test]
fn identical_runs_are_bit_identical() {
    let specs = [
        OptimizerSpec::Sgd(SgdConfig { learning_rate: 0.05, momentum: 0.5, ..Default::default() }),
        OptimizerSpec::RmsProp(RmsPropConfig { learning_rate: 0.01, ..Default::default() }),
        OptimizerSpec::Adam(AdamConfig { learning_rate: 0.02, decay: 0.01, ..Default::default() }),
    ];
    for spec in specs {
        let first = trajectory(spec, 50);
        let second = trajectory(spec, 50);
        assert_eq!(first, second, "{} diverged between runs", spec.name());
        // the parameters actually moved
        assert_ne!(first.first(), first.last());
    }
}

#[test]
fn trained_parameters_survive_a_snapshot() {
    let (inputs, targets) = regression_data();
    let mut layer = seeded_layer(5);
    let mut optimizer = OptimizerSpec::default().build(&layer).unwrap();
    for _ in 0..10 {
        let (_, grads) = loss_and_gradients(&layer, &inputs, &targets);
        optimizer.fit(&mut layer, &grads);
    }

    let path = std::env::temp_dir().join(format!("rtorch_optim_snapshot_{}.bin", std::process::id()));
    serialization::save(layer.parameters(), &path).unwrap();

    let mut restored = seeded_layer(6);
    assert_ne!(restored.parameters(), layer.parameters());
    serialization::load_into(restored.parameters_mut(), &path, true).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(restored.parameters(), layer.parameters());
}

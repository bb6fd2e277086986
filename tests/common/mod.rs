#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use rtorch_optim::nn::{GradientSet, Linear, MSELoss, Module};
use rtorch_optim::optim::Optimizer;
use rtorch_optim::tensor::{Tensor, TensorData};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Eight samples of `y = 2 * x0 - 3 * x1 + 1`.
pub fn regression_data() -> (Tensor, Tensor) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for &x0 in &[-1.0, -0.5, 0.5, 1.0] {
        for &x1 in &[-1.0, 1.0] {
            xs.push(x0);
            xs.push(x1);
            ys.push(2.0 * x0 - 3.0 * x1 + 1.0);
        }
    }
    (
        Tensor::from_vec(xs, &[8, 2]).unwrap(),
        Tensor::from_vec(ys, &[8, 1]).unwrap(),
    )
}

pub fn seeded_layer(seed: u64) -> Linear {
    let mut rng = StdRng::seed_from_u64(seed);
    Linear::new(2, 1, true, &mut rng)
}

/// Loss and gradients of `layer` on the regression data.
pub fn loss_and_gradients(layer: &Linear, inputs: &Tensor, targets: &Tensor) -> (TensorData, GradientSet) {
    let loss_fn = MSELoss::new();
    let prediction = layer.forward(inputs).unwrap();
    let loss = loss_fn.forward(&prediction, targets).unwrap();
    let grad_output = loss_fn.backward(&prediction, targets).unwrap();
    (loss, layer.backward(inputs, &grad_output).unwrap())
}

/// Runs `steps` full-batch updates and returns `(initial_loss, final_loss)`.
pub fn train(
    layer: &mut Linear,
    optimizer: &mut dyn Optimizer<Linear, Gradient = GradientSet>,
    steps: usize,
) -> (TensorData, TensorData) {
    let (inputs, targets) = regression_data();
    let (initial, _) = loss_and_gradients(layer, &inputs, &targets);
    for _ in 0..steps {
        let (_, grads) = loss_and_gradients(layer, &inputs, &targets);
        optimizer.fit(layer, &grads);
    }
    let (last, _) = loss_and_gradients(layer, &inputs, &targets);
    (initial, last)
}

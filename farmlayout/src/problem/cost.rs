/// Cost evaluated for the turbine coordinates
pub type CostFn = Box<dyn Fn(&[f64], &[f64]) -> f64>;

/// Gradient of a [`CostFn`]: derivatives w.r.t. every x and every y coordinate
pub type CostGradFn = Box<dyn Fn(&[f64], &[f64]) -> (Vec<f64>, Vec<f64>)>;

/// The quantity minimized by a layout optimization (typically the negated annual energy production).
pub trait CostModel {
    /// Number of turbines the model is defined for
    fn n_wt(&self) -> usize;

    fn cost(&self, xs: &[f64], ys: &[f64]) -> f64;

    /// Analytic gradient `(dcost/dx, dcost/dy)`.
    /// `None` when the model has none, finite differences are used instead.
    fn gradient(&self, _xs: &[f64], _ys: &[f64]) -> Option<(Vec<f64>, Vec<f64>)> {
        None
    }
}

/// [`CostModel`] built from plain closures
pub struct CostComponent {
    n_wt: usize,
    cost_fn: CostFn,
    grad_fn: Option<CostGradFn>,
}

impl CostComponent {
    pub fn new(n_wt: usize, cost_fn: impl Fn(&[f64], &[f64]) -> f64 + 'static) -> Self {
        Self {
            n_wt,
            cost_fn: Box::new(cost_fn),
            grad_fn: None,
        }
    }

    pub fn with_gradient(
        mut self,
        grad_fn: impl Fn(&[f64], &[f64]) -> (Vec<f64>, Vec<f64>) + 'static,
    ) -> Self {
        self.grad_fn = Some(Box::new(grad_fn));
        self
    }

    /// Wraps an energy production model: the cost is the negated AEP, and so is its gradient.
    pub fn aep(
        n_wt: usize,
        aep_fn: impl Fn(&[f64], &[f64]) -> f64 + 'static,
        aep_grad_fn: Option<CostGradFn>,
    ) -> Self {
        let mut component = CostComponent::new(n_wt, move |xs, ys| -aep_fn(xs, ys));
        if let Some(aep_grad_fn) = aep_grad_fn {
            component = component.with_gradient(move |xs, ys| {
                let (dx, dy) = aep_grad_fn(xs, ys);
                (
                    dx.into_iter().map(|d| -d).collect(),
                    dy.into_iter().map(|d| -d).collect(),
                )
            });
        }
        component
    }
}

impl CostModel for CostComponent {
    fn n_wt(&self) -> usize {
        self.n_wt
    }

    fn cost(&self, xs: &[f64], ys: &[f64]) -> f64 {
        (self.cost_fn)(xs, ys)
    }

    fn gradient(&self, xs: &[f64], ys: &[f64]) -> Option<(Vec<f64>, Vec<f64>)> {
        self.grad_fn.as_ref().map(|g| g(xs, ys))
    }
}

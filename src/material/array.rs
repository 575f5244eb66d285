use super::{elastic_response, Elastic, History, LinearHardening, MaterialPoint, ModelType, Response, Update};
use crate::base::{Config, Error, ParamElastic, ParamLinearHardening, ParamMaterial};
use crate::tensor::{i2, i4, i4d, i4rt, i4s, ii, t2_unflatten, t2_write_flat, t4_write_flat};
use rayon::prelude::*;
use russell_tensor::{Mandel, Tensor2, Tensor4};

/// Holds an array of material points with mixed models
///
/// The points are addressed by a flat index (row-major over `shape`), e.g.,
/// `[number of elements, number of integration points]`. Each point must be
/// assigned a model exactly once before any evaluation.
///
/// The hyperelastic points keep only a reference to a shared (read-only) set of
/// parameters. Each elasto-plastic point owns its state and history.
///
/// # Errors in batch evaluations
///
/// A batch evaluation is all-or-nothing. The trial states of all points are computed
/// first and stored only if every point succeeds. On error, the first failing point's
/// error is returned and nothing changes: the deformation gradient, stress, and
/// tangent arrays keep their previous contents, and so do the (uncommitted and
/// committed) states of all elasto-plastic points.
pub struct Array {
    /// Holds configuration data
    config: Config,

    /// Shape of the point-index space
    shape: Vec<usize>,

    /// Model assigned to each point
    kinds: Vec<ModelType>,

    /// Index of each point into the group of its model
    index: Vec<usize>,

    /// Group of hyperelastic parameter sets
    elastic: Vec<ParamElastic>,

    /// Group of elasto-plastic points
    plastic: Vec<LinearHardening>,

    /// Flat index of the point owning each elasto-plastic state
    owner: Vec<usize>,

    /// Deformation gradients of the last successful evaluation
    def_grad: Vec<Tensor2>,

    /// Cauchy stresses of the last successful evaluation
    stress: Vec<Tensor2>,

    /// Tangents of the last successful evaluation (if computed)
    tangent: Option<Vec<Tensor4>>,
}

impl Array {
    /// Allocates a new instance with the default configuration
    pub fn new(shape: &[usize]) -> Self {
        Array::alloc(shape, Config::new())
    }

    /// Allocates a new instance with the given configuration
    pub fn with_config(shape: &[usize], config: &Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Array::alloc(shape, *config))
    }

    fn alloc(shape: &[usize], config: Config) -> Self {
        let size = shape.iter().product();
        Array {
            config,
            shape: shape.to_vec(),
            kinds: vec![ModelType::Unset; size],
            index: vec![0; size],
            elastic: Vec::new(),
            plastic: Vec::new(),
            owner: Vec::new(),
            def_grad: vec![Tensor2::identity(Mandel::General); size],
            stress: vec![Tensor2::new(Mandel::General); size],
            tangent: None,
        }
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the configuration
    pub fn set_config(&mut self, config: &Config) -> Result<&mut Self, Error> {
        config.validate()?;
        self.config = *config;
        Ok(self)
    }

    /// Returns the shape of the point-index space
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of points
    pub fn size(&self) -> usize {
        self.kinds.len()
    }

    /// Returns the model assigned to each point
    pub fn kinds(&self) -> &[ModelType] {
        &self.kinds
    }

    /// Converts a multi-dimensional point index into the flat (row-major) index
    pub fn flat_index(&self, multi: &[usize]) -> Result<usize, Error> {
        if multi.len() != self.shape.len() {
            return Err(Error::ShapeMismatch(format!(
                "index has {} dimensions but the array has {}",
                multi.len(),
                self.shape.len()
            )));
        }
        let mut flat = 0;
        for (i, (idx, dim)) in multi.iter().zip(self.shape.iter()).enumerate() {
            if idx >= dim {
                return Err(Error::IndexOutOfBounds(format!(
                    "index {} of dimension {} must be < {}",
                    idx, i, dim
                )));
            }
            flat = flat * dim + idx;
        }
        Ok(flat)
    }

    /// Returns the selected points after checking that they have no material yet
    fn unassigned_selection(&self, mask: &[bool]) -> Result<Vec<usize>, Error> {
        if mask.len() != self.size() {
            return Err(Error::ShapeMismatch(format!(
                "mask has {} entries but the array has {} points",
                mask.len(),
                self.size()
            )));
        }
        let points: Vec<usize> = (0..mask.len()).filter(|p| mask[*p]).collect();
        if let Some(p) = points.iter().find(|p| self.kinds[**p] != ModelType::Unset) {
            return Err(Error::AlreadyAssigned(*p));
        }
        Ok(points)
    }

    /// Checks the group indices of the selected points
    fn check_group(&self, points: &[usize], group: &[usize], n_params: usize) -> Result<(), Error> {
        if group.len() != self.size() {
            return Err(Error::ShapeMismatch(format!(
                "group index has {} entries but the array has {} points",
                group.len(),
                self.size()
            )));
        }
        if let Some(p) = points.iter().find(|p| group[**p] >= n_params) {
            return Err(Error::IndexOutOfBounds(format!(
                "group index {} of point {} must be < {}",
                group[*p], p, n_params
            )));
        }
        Ok(())
    }

    /// Assigns the hyperelastic model to the selected points, sharing one set of parameters
    pub fn set_elastic(&mut self, mask: &[bool], param: &ParamElastic) -> Result<(), Error> {
        param.validate()?;
        let points = self.unassigned_selection(mask)?;
        let g = self.elastic.len();
        self.elastic.push(*param);
        for p in &points {
            self.kinds[*p] = ModelType::Elastic;
            self.index[*p] = g;
        }
        tracing::debug!(points = points.len(), kk = param.kk, gg = param.gg, "assigned elastic material");
        Ok(())
    }

    /// Assigns the elasto-plastic model to the selected points (each point gets its own state)
    pub fn set_linear_hardening(&mut self, mask: &[bool], param: &ParamLinearHardening) -> Result<(), Error> {
        param.validate()?;
        let points = self.unassigned_selection(mask)?;
        let mut states = Vec::with_capacity(points.len());
        for _ in &points {
            states.push(LinearHardening::new(param)?);
        }
        self.append_plastic(&points, states);
        tracing::debug!(
            points = points.len(),
            kk = param.kk,
            gg = param.gg,
            tauy0 = param.tauy0,
            hh = param.hh,
            "assigned linear hardening material"
        );
        Ok(())
    }

    /// Assigns the hyperelastic model to the selected points, reading the parameters by group index
    ///
    /// `group[p]` is the index into `params` used by point `p`; entries of unselected
    /// points are ignored. All sets in `params` are appended to the elastic group.
    pub fn set_elastic_indexed(&mut self, mask: &[bool], group: &[usize], params: &[ParamElastic]) -> Result<(), Error> {
        for param in params {
            param.validate()?;
        }
        let points = self.unassigned_selection(mask)?;
        self.check_group(&points, group, params.len())?;
        let offset = self.elastic.len();
        self.elastic.extend_from_slice(params);
        for p in &points {
            self.kinds[*p] = ModelType::Elastic;
            self.index[*p] = offset + group[*p];
        }
        tracing::debug!(points = points.len(), groups = params.len(), "assigned elastic material");
        Ok(())
    }

    /// Assigns the elasto-plastic model to the selected points, reading the parameters by group index
    ///
    /// `group[p]` is the index into `params` used by point `p`; entries of unselected
    /// points are ignored.
    pub fn set_linear_hardening_indexed(
        &mut self,
        mask: &[bool],
        group: &[usize],
        params: &[ParamLinearHardening],
    ) -> Result<(), Error> {
        for param in params {
            param.validate()?;
        }
        let points = self.unassigned_selection(mask)?;
        self.check_group(&points, group, params.len())?;
        let mut states = Vec::with_capacity(points.len());
        for p in &points {
            states.push(LinearHardening::new(&params[group[*p]])?);
        }
        self.append_plastic(&points, states);
        tracing::debug!(points = points.len(), groups = params.len(), "assigned linear hardening material");
        Ok(())
    }

    /// Assigns any model to the selected points
    pub fn set_material(&mut self, mask: &[bool], param: &ParamMaterial) -> Result<(), Error> {
        match param {
            ParamMaterial::Elastic(p) => self.set_elastic(mask, p),
            ParamMaterial::LinearHardening(p) => self.set_linear_hardening(mask, p),
        }
    }

    fn append_plastic(&mut self, points: &[usize], states: Vec<LinearHardening>) {
        for (p, state) in points.iter().zip(states) {
            self.kinds[*p] = ModelType::LinearHardening;
            self.index[*p] = self.plastic.len();
            self.plastic.push(state);
            self.owner.push(*p);
        }
    }

    /// Checks that all points have a material assigned
    pub fn check(&self) -> Result<(), Error> {
        let n = self.kinds.iter().filter(|k| **k == ModelType::Unset).count();
        if n > 0 {
            return Err(Error::UnassignedPoints(n));
        }
        Ok(())
    }

    fn map_points<T>(&self, fun: impl Fn(usize) -> T) -> Result<Vec<T>, Error> {
        self.check()?;
        Ok((0..self.size()).map(fun).collect())
    }

    /// Returns whether each point holds the hyperelastic model
    pub fn is_elastic(&self) -> Result<Vec<bool>, Error> {
        self.map_points(|p| self.kinds[p] == ModelType::Elastic)
    }

    /// Returns whether each point may develop plastic strains
    pub fn is_plastic(&self) -> Result<Vec<bool>, Error> {
        self.map_points(|p| self.kinds[p].is_plastic())
    }

    /// Returns whether each point holds the linear hardening model
    pub fn is_linear_hardening(&self) -> Result<Vec<bool>, Error> {
        self.map_points(|p| self.kinds[p] == ModelType::LinearHardening)
    }

    /// Returns the bulk modulus of each point
    pub fn kk(&self) -> Result<Vec<f64>, Error> {
        self.map_points(|p| match self.kinds[p] {
            ModelType::Elastic => self.elastic[self.index[p]].kk,
            ModelType::LinearHardening => self.plastic[self.index[p]].k(),
            ModelType::Unset => 0.0,
        })
    }

    /// Returns the shear modulus of each point
    pub fn gg(&self) -> Result<Vec<f64>, Error> {
        self.map_points(|p| match self.kinds[p] {
            ModelType::Elastic => self.elastic[self.index[p]].gg,
            ModelType::LinearHardening => self.plastic[self.index[p]].g(),
            ModelType::Unset => 0.0,
        })
    }

    /// Returns the (uncommitted) accumulated plastic strain of each point (zero if elastic)
    pub fn epsp(&self) -> Result<Vec<f64>, Error> {
        self.map_points(|p| match self.kinds[p] {
            ModelType::LinearHardening => self.plastic[self.index[p]].epsp(),
            _ => 0.0,
        })
    }

    fn check_point(&self, p: usize, kind: ModelType) -> Result<usize, Error> {
        if p >= self.size() {
            return Err(Error::IndexOutOfBounds(format!(
                "point {} must be < {}",
                p,
                self.size()
            )));
        }
        if self.kinds[p] != kind {
            return Err(Error::ModelTypeMismatch(p));
        }
        Ok(self.index[p])
    }

    /// Returns a copy of the hyperelastic point at the batch's current deformation gradient
    pub fn elastic(&self, p: usize) -> Result<Elastic, Error> {
        let g = self.check_point(p, ModelType::Elastic)?;
        let mut point = Elastic::new(&self.elastic[g])?;
        point.set_def_grad(&self.def_grad[p], self.tangent.is_some())?;
        Ok(point)
    }

    /// Returns access to the elasto-plastic point
    pub fn linear_hardening(&self, p: usize) -> Result<&LinearHardening, Error> {
        let g = self.check_point(p, ModelType::LinearHardening)?;
        Ok(&self.plastic[g])
    }

    /// Restores the history of an elasto-plastic point and updates the point's outputs
    ///
    /// The stress (and tangent) of the point correspond to F = F_t afterwards.
    pub fn restore_history(&mut self, p: usize, history: &History) -> Result<(), Error> {
        let g = self.check_point(p, ModelType::LinearHardening)?;
        let point = &mut self.plastic[g];
        point.restore_history(history)?;
        self.def_grad[p] = point.def_grad().clone();
        self.stress[p] = point.stress().clone();
        if let (Some(tangent), Some(tt)) = (self.tangent.as_mut(), point.tangent()) {
            tangent[p] = tt.clone();
        }
        Ok(())
    }

    /// Sets the deformation gradients and recomputes the stresses (and tangents if requested)
    ///
    /// The deformation gradients must be [Mandel::General]. On error, nothing
    /// changes (see the documentation of [Array]).
    pub fn set_def_grad(&mut self, def_grad: &[Tensor2], with_tangent: bool) -> Result<(), Error> {
        let result = self.calc_response(def_grad, with_tangent);
        if let Err(error) = &result {
            tracing::warn!(%error, "batch evaluation aborted");
        }
        result
    }

    /// Sets the deformation gradients from a flat row-major array of length 9 × size
    pub fn set_def_grad_flat(&mut self, data: &[f64], with_tangent: bool) -> Result<(), Error> {
        if data.len() != 9 * self.size() {
            return Err(Error::ShapeMismatch(format!(
                "flat array has {} values but {} are required",
                data.len(),
                9 * self.size()
            )));
        }
        let def_grad = t2_unflatten(data)?;
        self.set_def_grad(&def_grad, with_tangent)
    }

    fn calc_response(&mut self, def_grad: &[Tensor2], with_tangent: bool) -> Result<(), Error> {
        self.check()?;
        let n = self.size();
        if def_grad.len() != n {
            return Err(Error::ShapeMismatch(format!(
                "{} deformation gradients given but the array has {} points",
                def_grad.len(),
                n
            )));
        }
        let (parallel, min_len) = (self.config.parallel, self.config.min_points_per_task);

        // trial states of the elasto-plastic points (each state is owned by one point)
        let trial =
            |(point, p): (&LinearHardening, &usize)| point.trial(&def_grad[*p], point.history(), with_tangent);
        let updates: Vec<Update> = if parallel {
            self.plastic
                .par_iter()
                .zip(self.owner.par_iter())
                .with_min_len(min_len)
                .map(trial)
                .collect::<Result<Vec<Update>, Error>>()?
        } else {
            self.plastic
                .iter()
                .zip(self.owner.iter())
                .map(trial)
                .collect::<Result<Vec<Update>, Error>>()?
        };

        // gather the outputs
        let (kinds, index, elastic, trials) = (&self.kinds, &self.index, &self.elastic, &updates);
        let respond = |p: usize| -> Result<Response, Error> {
            match kinds[p] {
                ModelType::Elastic => elastic_response(&elastic[index[p]], &def_grad[p], with_tangent),
                ModelType::LinearHardening => Ok(trials[index[p]].response()),
                ModelType::Unset => Err(Error::UnassignedPoints(1)),
            }
        };
        let responses: Vec<Response> = if parallel {
            (0..n).into_par_iter().with_min_len(min_len).map(respond).collect::<Result<Vec<Response>, Error>>()?
        } else {
            (0..n).map(respond).collect::<Result<Vec<Response>, Error>>()?
        };

        // all points succeeded: store the elasto-plastic states and swap in the new results
        let store = |((point, p), update): ((&mut LinearHardening, &usize), Update)| point.store(&def_grad[*p], update);
        if parallel {
            self.plastic
                .par_iter_mut()
                .zip(self.owner.par_iter())
                .zip(updates.into_par_iter())
                .with_min_len(min_len)
                .for_each(store);
        } else {
            self.plastic
                .iter_mut()
                .zip(self.owner.iter())
                .zip(updates)
                .for_each(store);
        }
        let mut stress = Vec::with_capacity(n);
        let mut tangent = if with_tangent { Some(Vec::with_capacity(n)) } else { None };
        for response in responses {
            stress.push(response.stress);
            if let (Some(all), Some(tt)) = (tangent.as_mut(), response.tangent) {
                all.push(tt);
            }
        }
        self.def_grad = def_grad.to_vec();
        self.stress = stress;
        self.tangent = tangent;
        tracing::debug!(
            points = n,
            yielding = self.plastic.iter().filter(|p| p.yielding()).count(),
            "evaluated batch"
        );
        Ok(())
    }

    /// Sets the deformation gradients and returns copies of the stresses and tangents
    pub fn evaluate(
        &mut self,
        def_grad: &[Tensor2],
        with_tangent: bool,
    ) -> Result<(Vec<Tensor2>, Option<Vec<Tensor4>>), Error> {
        self.set_def_grad(def_grad, with_tangent)?;
        Ok((self.stress.clone(), self.tangent.clone()))
    }

    /// Returns the deformation gradients of the last successful evaluation
    pub fn def_grad(&self) -> &[Tensor2] {
        &self.def_grad
    }

    /// Returns the stresses of the last successful evaluation
    pub fn stress(&self) -> &[Tensor2] {
        &self.stress
    }

    /// Returns the tangents of the last successful evaluation, if computed
    pub fn tangent(&self) -> Option<&[Tensor4]> {
        self.tangent.as_deref()
    }

    /// Writes the stresses into a caller-owned flat row-major array of length 9 × size
    pub fn stress_into(&self, out: &mut [f64]) -> Result<(), Error> {
        if out.len() != 9 * self.size() {
            return Err(Error::ShapeMismatch(format!(
                "output has {} values but {} are required",
                out.len(),
                9 * self.size()
            )));
        }
        for (chunk, sig) in out.chunks_exact_mut(9).zip(self.stress.iter()) {
            t2_write_flat(sig, chunk)?;
        }
        Ok(())
    }

    /// Writes the tangents into a caller-owned flat row-major array of length 81 × size
    pub fn tangent_into(&self, out: &mut [f64]) -> Result<(), Error> {
        let tangent = self.tangent.as_ref().ok_or(Error::TangentUnavailable)?;
        if out.len() != 81 * self.size() {
            return Err(Error::ShapeMismatch(format!(
                "output has {} values but {} are required",
                out.len(),
                81 * self.size()
            )));
        }
        for (chunk, tt) in out.chunks_exact_mut(81).zip(tangent.iter()) {
            t4_write_flat(tt, chunk)?;
        }
        Ok(())
    }

    /// Commits the current state of all elasto-plastic points (accepts the solver step)
    pub fn commit_all(&mut self) -> Result<(), Error> {
        self.check()?;
        if self.config.parallel {
            let min_len = self.config.min_points_per_task;
            self.plastic.par_iter_mut().with_min_len(min_len).for_each(|p| p.commit());
        } else {
            self.plastic.iter_mut().for_each(|p| p.commit());
        }
        tracing::debug!(points = self.plastic.len(), "committed batch");
        Ok(())
    }

    /// Alias of [Array::commit_all]
    pub fn increment(&mut self) -> Result<(), Error> {
        self.commit_all()
    }

    /// Returns one copy of a tensor per point
    fn replicate<T: Clone + Send + Sync>(&self, tensor: T) -> Vec<T> {
        if self.config.parallel {
            let min_len = self.config.min_points_per_task;
            (0..self.size())
                .into_par_iter()
                .with_min_len(min_len)
                .map(|_| tensor.clone())
                .collect()
        } else {
            vec![tensor; self.size()]
        }
    }

    /// Returns the second-order unit tensor of each point (see [crate::tensor::i2])
    pub fn i2(&self) -> Vec<Tensor2> {
        self.replicate(i2())
    }

    /// Returns the dyadic product of unit tensors of each point (see [crate::tensor::ii])
    pub fn ii(&self) -> Vec<Tensor4> {
        self.replicate(ii())
    }

    /// Returns the fourth-order unit tensor of each point (see [crate::tensor::i4])
    pub fn i4(&self) -> Vec<Tensor4> {
        self.replicate(i4())
    }

    /// Returns the right-transposed fourth-order unit tensor of each point (see [crate::tensor::i4rt])
    pub fn i4rt(&self) -> Vec<Tensor4> {
        self.replicate(i4rt())
    }

    /// Returns the symmetric projection tensor of each point (see [crate::tensor::i4s])
    pub fn i4s(&self) -> Vec<Tensor4> {
        self.replicate(i4s())
    }

    /// Returns the deviatoric projection tensor of each point (see [crate::tensor::i4d])
    pub fn i4d(&self) -> Vec<Tensor4> {
        self.replicate(i4d())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

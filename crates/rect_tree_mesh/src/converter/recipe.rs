use super::ConvertError;
use crate::{CellComplex, ComplexConfig};

use rect_tree_core::prelude::*;
use rect_tree_storage::RectTree;

/// Where one output value comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ValueSource {
    /// A coordinate of the domain point.
    Domain(usize),
    /// A component of the sampled range point.
    Range(usize),
    Constant(f64),
}

impl ValueSource {
    /// # Panics
    ///
    /// If a `Domain` or `Range` index is out of bounds. `GeometryRecipe::validate` rules this out.
    #[inline]
    pub fn value<const D: usize, const R: usize>(&self, drpt: &[f64; D], rrpt: &[f64; R]) -> f64 {
        match *self {
            ValueSource::Domain(i) => drpt[i],
            ValueSource::Range(i) => rrpt[i],
            ValueSource::Constant(v) => v,
        }
    }

    fn validate(&self, target: &str, domain_dimension: usize, range_dimension: usize) -> Result<(), ConvertError> {
        match *self {
            ValueSource::Domain(index) if index >= domain_dimension => Err(ConvertError::BadDomainSource {
                target: target.to_string(),
                index,
                dimension: domain_dimension,
            }),
            ValueSource::Range(index) if index >= range_dimension => Err(ConvertError::BadRangeSource {
                target: target.to_string(),
                index,
                dimension: range_dimension,
            }),
            _ => Ok(()),
        }
    }
}

/// Describes how a domain point and its sample become a point of a `CellComplex` and its per-point data.
///
/// ```
/// use rect_tree_mesh::prelude::*;
///
/// // A height field z = f(x, y), with the value of f also saved as a scalar.
/// let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Domain(1), ValueSource::Range(0)])
///     .with_scalar("f", ValueSource::Range(0))
///     .with_vector("NORMALS", [ValueSource::Range(1), ValueSource::Range(2), ValueSource::Range(3)]);
///
/// assert!(recipe.validate(2, 4).is_ok());
/// assert!(recipe.validate(2, 1).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GeometryRecipe {
    pub points: [ValueSource; 3],
    pub scalars: Vec<(String, ValueSource)>,
    pub vectors: Vec<(String, [ValueSource; 3])>,
}

impl GeometryRecipe {
    pub fn new(points: [ValueSource; 3]) -> Self {
        Self {
            points,
            scalars: Vec::new(),
            vectors: Vec::new(),
        }
    }

    pub fn with_scalar(mut self, name: &str, source: ValueSource) -> Self {
        self.scalars.push((name.to_string(), source));

        self
    }

    pub fn with_vector(mut self, name: &str, sources: [ValueSource; 3]) -> Self {
        self.vectors.push((name.to_string(), sources));

        self
    }

    /// Check every source index against the domain and range dimensions.
    pub fn validate(&self, domain_dimension: usize, range_dimension: usize) -> Result<(), ConvertError> {
        for (k, source) in self.points.iter().enumerate() {
            source.validate(&format!("point[{}]", k), domain_dimension, range_dimension)?;
        }
        for (name, source) in self.scalars.iter() {
            source.validate(name, domain_dimension, range_dimension)?;
        }
        for (name, sources) in self.vectors.iter() {
            for (k, source) in sources.iter().enumerate() {
                source.validate(&format!("{}[{}]", name, k), domain_dimension, range_dimension)?;
            }
        }

        Ok(())
    }

    pub fn point<const D: usize, const R: usize>(&self, drpt: &[f64; D], rrpt: &[f64; R]) -> Vec3 {
        [
            self.points[0].value(drpt, rrpt),
            self.points[1].value(drpt, rrpt),
            self.points[2].value(drpt, rrpt),
        ]
    }

    /// Add the point for `(drpt, rrpt)` to `cplx`. If the point is new, its datasets are filled in too.
    ///
    /// Returns `None` if the point has a NaN coordinate.
    pub fn add_point_and_data_from_data<C: ComplexConfig, const D: usize, const R: usize>(
        &self,
        cplx: &mut CellComplex<C>,
        drpt: &[f64; D],
        rrpt: &[f64; R],
    ) -> Option<usize> {
        let idx = cplx.add_point(self.point(drpt, rrpt))?;
        for (name, source) in self.scalars.iter() {
            cplx.add_scalar_data_if_new(name, source.value(drpt, rrpt));
        }
        for (name, sources) in self.vectors.iter() {
            let v = [
                sources[0].value(drpt, rrpt),
                sources[1].value(drpt, rrpt),
                sources[2].value(drpt, rrpt),
            ];
            cplx.add_vector_data_if_new(name, v);
        }

        Some(idx)
    }

    /// `add_point_and_data_from_data` for the tree vertex `d` and its cached sample. A vertex that was never sampled has a
    /// NaN sample.
    pub fn add_point_and_data_from_tree<C: ComplexConfig, const D: usize, const R: usize>(
        &self,
        cplx: &mut CellComplex<C>,
        tree: &RectTree<D, R>,
        d: Diti,
    ) -> Option<usize> {
        let drpt = tree.diti_to_drpt(d);
        let rrpt = tree.cached_sample_or_nan(d);

        self.add_point_and_data_from_data(cplx, &drpt, &rrpt)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::StrictChecks;

    use pretty_assertions::assert_eq;

    #[test]
    fn validation_names_the_bad_source() {
        let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Domain(1), ValueSource::Constant(0.0)])
            .with_vector("v", [ValueSource::Range(0), ValueSource::Range(3), ValueSource::Constant(1.0)]);

        assert_eq!(recipe.validate(1, 4), Err(ConvertError::BadDomainSource {
            target: "point[1]".to_string(),
            index: 1,
            dimension: 1,
        }));
        assert_eq!(recipe.validate(2, 2), Err(ConvertError::BadRangeSource {
            target: "v[1]".to_string(),
            index: 3,
            dimension: 2,
        }));
        assert_eq!(recipe.validate(2, 4), Ok(()));
    }

    #[test]
    fn data_is_written_once_per_point() {
        let recipe = GeometryRecipe::new([ValueSource::Domain(0), ValueSource::Constant(0.0), ValueSource::Constant(0.0)])
            .with_scalar("y", ValueSource::Range(0));
        let mut cplx = CellComplex::<StrictChecks>::new();

        assert_eq!(recipe.add_point_and_data_from_data(&mut cplx, &[1.0], &[10.0]), Some(0));
        assert_eq!(recipe.add_point_and_data_from_data(&mut cplx, &[1.0], &[20.0]), Some(0));
        assert_eq!(recipe.add_point_and_data_from_data(&mut cplx, &[2.0], &[30.0]), Some(1));
        assert_eq!(cplx.scalar_data("y"), Some(vec![10.0, 30.0]));

        // NaN in the data but not the point is fine.
        assert_eq!(recipe.add_point_and_data_from_data(&mut cplx, &[3.0], &[f64::NAN]), Some(2));
        let nan_point = GeometryRecipe::new([ValueSource::Range(0), ValueSource::Constant(0.0), ValueSource::Constant(0.0)]);
        assert_eq!(nan_point.add_point_and_data_from_data(&mut cplx, &[4.0], &[f64::NAN]), None);
    }
}

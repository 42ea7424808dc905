// standard library
use std::collections::BTreeMap;

// internal modules
use cccc_record::{Array, Kind, Metadata, Stream};
use cccc_scatter::{decode_orders, encode_orders, BandWidths, ScatterKind, ScatterMatrix};
use cccc_utils::f;

// crate modules
use crate::error::{Error, Result};
use crate::layouts::{self, FileControl, NuclideControl};

// external crates
use serde::Serialize;

/// One scattering block of a nuclide
///
/// Holds one sparse matrix per Legendre order, starting from the first order
/// encoded in `IDSCT`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterBlock {
    /// `100 * type + first order`
    pub idsct: i32,
    /// Matrix of each Legendre order in file order
    pub orders: Vec<ScatterMatrix>,
}

impl ScatterBlock {
    /// Reaction type, or `None` for an `IDSCT` outside of the definition
    pub fn kind(&self) -> Option<ScatterKind> {
        ScatterKind::from_idsct(self.idsct).map(|(kind, _)| kind)
    }

    /// Legendre order of the first matrix
    pub fn first_order(&self) -> usize {
        ScatterKind::from_idsct(self.idsct).map_or(0, |(_, order)| order)
    }

    /// Matrix of Legendre order `l`, if present in the block
    pub fn order(&self, l: usize) -> Option<&ScatterMatrix> {
        self.orders.get(l.checked_sub(self.first_order())?)
    }

    /// Neutron production matrices, i.e. every order scaled by the multiplicity
    ///
    /// See [ScatterKind] for the assumption made about n2n blocks.
    pub fn production(&self) -> Vec<ScatterMatrix> {
        let multiplicity = self.kind().map_or(1.0, |k| k.multiplicity());
        self.orders.iter().map(|m| m.scaled(multiplicity)).collect()
    }
}

/// Cross sections of a single nuclide
///
/// The `metadata` holds every field of the nuclide control, principal cross
/// section and nuclide chi records under their CCCC names. Conditional fields
/// are only present when the flags in the control record say they are.
///
/// For example, the total cross section of group 1 is the first value of the
/// `STOTPL` row for Legendre order 0:
///
/// ```rust
/// # use cccc_isotxs::Nuclide;
/// let nuclide = Nuclide::new("U235", 4, 1);
/// let total = nuclide.metadata.floats("STOTPL").unwrap().row(0).unwrap();
/// assert_eq!(total.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nuclide {
    /// Nuclide label, as listed in `HISONM`
    pub label: String,
    /// Control and principal cross section values
    pub metadata: Metadata,
    /// Scattering blocks by block index, only blocks with `LORD > 0`
    pub scatter: BTreeMap<usize, ScatterBlock>,
}

impl Nuclide {
    /// Nuclide with zero cross sections and no scattering
    ///
    /// All flags are off, `LTOT = LTRN = 1` and the absorber, identifier and
    /// material labels are set to `label`.
    pub fn new(label: &str, ngroup: usize, nscmax: usize) -> Self {
        let mut metadata = Metadata::new();
        for name in ["HABSID", "HIDENT", "HMAT"] {
            metadata.insert(name, label);
        }
        for name in layouts::NUCLIDE_CONTROL {
            match name {
                "LTOT" | "LTRN" => metadata.insert(name, 1),
                _ => match Kind::implicit(name) {
                    Kind::Int => metadata.insert(name, 0),
                    _ => metadata.insert(name, 0.0_f32),
                },
            };
        }

        metadata.insert("IDSCT", vec![0; nscmax]);
        metadata.insert("LORD", vec![0; nscmax]);
        for name in ["JBAND", "IJJ"] {
            metadata.insert(name, Array::filled(vec![nscmax, ngroup], 0));
        }

        metadata.insert("STRPL", Array::filled(vec![1, ngroup], 0.0_f32));
        metadata.insert("STOTPL", Array::filled(vec![1, ngroup], 0.0_f32));
        metadata.insert("SNGAM", vec![0.0_f32; ngroup]);
        metadata.insert("STRPD", Array::filled(vec![0, ngroup], 0.0_f32));

        Self {
            label: label.to_string(),
            metadata,
            scatter: BTreeMap::new(),
        }
    }

    pub(crate) fn with_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            metadata: Metadata::new(),
            scatter: BTreeMap::new(),
        }
    }

    /// Number of energy groups, from the shape of `SNGAM`
    pub fn num_groups(&self) -> Option<usize> {
        self.metadata.floats("SNGAM").map(|a| a.len())
    }

    /// Number of scattering block slots, from the length of `LORD`
    pub fn num_blocks(&self) -> Option<usize> {
        self.metadata.ints("LORD").map(|a| a.len())
    }

    /// Number of Legendre orders in block `n`, zero if absent
    pub fn num_orders(&self, n: usize) -> usize {
        self.metadata
            .ints("LORD")
            .and_then(|a| a.as_slice().get(n).copied())
            .map_or(0, |v| v.max(0) as usize)
    }

    /// Band widths of block `n` from its `JBAND` and `IJJ` rows
    pub fn band_widths(&self, n: usize) -> Result<BandWidths> {
        let jband = row(&self.metadata, "JBAND", n)?;
        let ijj = row(&self.metadata, "IJJ", n)?;
        Ok(BandWidths::from_isotxs(jband, ijj)?)
    }

    pub fn get_scatter_block(&self, n: usize) -> Option<&ScatterBlock> {
        self.scatter.get(&n)
    }

    /// First block of the given type, if there is one
    pub fn find_scatter_block(&self, kind: ScatterKind) -> Option<&ScatterBlock> {
        self.scatter.values().find(|b| b.kind() == Some(kind))
    }

    /// Set scattering block `n`, updating the control values to match
    ///
    /// Every matrix is stored in the band described by `widths`, so values
    /// outside of it are dropped. An empty list of orders removes the block.
    pub fn set_scatter_block(
        &mut self,
        n: usize,
        kind: ScatterKind,
        first_order: usize,
        orders: Vec<ScatterMatrix>,
        widths: &BandWidths,
    ) -> Result<()> {
        let nscmax = self.num_blocks().unwrap_or(0);
        if n >= nscmax {
            return Err(Error::Incompatible {
                field: f!("NSCMAX (block {n} of {nscmax})"),
            });
        }
        if self.num_groups() != Some(widths.num_groups()) {
            return Err(Error::Incompatible {
                field: "NGROUP".to_string(),
            });
        }

        let values = encode_orders(&orders, widths)?;
        let orders = decode_orders(&values, widths, orders.len())?;
        let (jband, ijj) = widths.to_isotxs();

        set_value(&mut self.metadata, "IDSCT", n, kind.idsct(first_order))?;
        set_value(&mut self.metadata, "LORD", n, orders.len() as i32)?;
        set_row(&mut self.metadata, "JBAND", n, &jband)?;
        set_row(&mut self.metadata, "IJJ", n, &ijj)?;

        match orders.is_empty() {
            true => self.scatter.remove(&n),
            false => self.scatter.insert(
                n,
                ScatterBlock {
                    idsct: kind.idsct(first_order),
                    orders,
                },
            ),
        };
        Ok(())
    }

    /// Records taken up on file, as counted by `LOCA`
    pub fn num_records(&self) -> Result<usize> {
        let ichi = self.metadata.count("ICHI")?;
        let lord = self.metadata.require_ints("LORD")?;
        let blocks = lord.as_slice().iter().filter(|l| **l > 0).count();
        Ok(2 + usize::from(ichi > 1) + blocks)
    }

    /// Largest Legendre order of any block, `IDSCT % 100 + LORD - 1`
    pub(crate) fn max_order(&self) -> usize {
        let (Some(idsct), Some(lord)) = (self.metadata.ints("IDSCT"), self.metadata.ints("LORD"))
        else {
            return 0;
        };
        idsct
            .as_slice()
            .iter()
            .zip(lord.as_slice())
            .filter(|(_, l)| **l > 0)
            .map(|(i, l)| (i % 100 + l - 1).max(0) as usize)
            .max()
            .unwrap_or(0)
    }

    /// Process the records of this nuclide
    pub(crate) fn read_write(&mut self, stream: &mut Stream, file: &FileControl) -> Result<()> {
        let label = self.label.clone();
        stream.record(
            &f!("nuclide control ({label})"),
            &layouts::nuclide_control(file),
            &mut self.metadata,
        )?;

        let control = NuclideControl::from_metadata(&self.metadata)
            .map_err(|e| stream.structural(f!("nuclide {label}: {e}")))?;

        stream.record(
            &f!("principal cross sections ({label})"),
            &layouts::principal(file, &control),
            &mut self.metadata,
        )?;

        if control.ichi > 1 {
            stream.record(
                &f!("nuclide chi ({label})"),
                &layouts::nuclide_chi(file, &control),
                &mut self.metadata,
            )?;
        }

        for n in 0..file.nscmax {
            self.read_write_block(stream, n)?;
        }
        Ok(())
    }

    fn read_write_block(&mut self, stream: &mut Stream, n: usize) -> Result<()> {
        let label = self.label.as_str();
        let lord = self.num_orders(n);
        if lord == 0 {
            return Ok(());
        }

        let widths = self
            .band_widths(n)
            .map_err(|e| stream.structural(f!("nuclide {label} block {n}: {e}")))?;

        let mut record = Metadata::new();
        if !stream.is_reading() {
            let block = self.scatter.get(&n).ok_or_else(|| {
                stream.structural(f!("nuclide {label} has LORD > 0 but no block {n}"))
            })?;
            let values = encode_orders(&block.orders, &widths)
                .map_err(|e| stream.structural(f!("nuclide {label} block {n}: {e}")))?;
            record.insert("SCAT", values);
        }

        stream.record(
            &f!("scattering block {n} ({label})"),
            &layouts::scattering(lord, widths.total()),
            &mut record,
        )?;

        if stream.is_reading() {
            let values = record.require_floats("SCAT")?;
            let orders = decode_orders(values.as_slice(), &widths, lord)
                .map_err(|e| stream.structural(f!("nuclide {label} block {n}: {e}")))?;
            let idsct = self.metadata.require_ints("IDSCT")?.as_slice()[n];
            self.scatter.insert(n, ScatterBlock { idsct, orders });
        }
        Ok(())
    }
}

/// Row `n` of an int array, or the whole array if it is one dimensional
fn row<'a>(metadata: &'a Metadata, key: &str, n: usize) -> Result<&'a [i32]> {
    let array = metadata.require_ints(key)?;
    let slice = match array.shape().len() {
        1 => Some(array.as_slice()),
        _ => array.row(n),
    };
    slice.ok_or_else(|| Error::Incompatible {
        field: f!("{key} (row {n})"),
    })
}

fn set_value(metadata: &mut Metadata, key: &str, n: usize, value: i32) -> Result<()> {
    let slot = metadata
        .ints_mut(key)
        .and_then(|a| a.as_mut_slice().get_mut(n))
        .ok_or_else(|| Error::Incompatible {
            field: key.to_string(),
        })?;
    *slot = value;
    Ok(())
}

fn set_row(metadata: &mut Metadata, key: &str, n: usize, values: &[i32]) -> Result<()> {
    let slot = metadata
        .ints_mut(key)
        .and_then(|a| a.row_mut(n))
        .filter(|r| r.len() == values.len())
        .ok_or_else(|| Error::Incompatible {
            field: key.to_string(),
        })?;
    slot.copy_from_slice(values);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cccc_scatter::ScatterBuilder;

    fn in_group(n: usize, value: f32) -> ScatterMatrix {
        let mut builder = ScatterBuilder::new(n);
        for g in 0..n {
            builder.push_column([(g, value)]).unwrap();
        }
        builder.finish().unwrap()
    }

    #[test]
    fn new_nuclide_is_consistent() {
        let nuclide = Nuclide::new("FE56", 3, 2);
        assert_eq!(nuclide.num_groups(), Some(3));
        assert_eq!(nuclide.num_blocks(), Some(2));
        assert_eq!(nuclide.metadata.int("LTOT"), Some(1));
        assert_eq!(nuclide.metadata.float("AMASS"), Some(0.0));
        assert_eq!(nuclide.metadata.string("HMAT"), Some("FE56"));
        assert_eq!(nuclide.num_records().unwrap(), 2);
        assert_eq!(nuclide.max_order(), 0);
    }

    #[test]
    fn set_block_updates_control() {
        let mut nuclide = Nuclide::new("FE56", 3, 2);
        let widths = BandWidths::new(&[0, 0, 0], &[0, 1, 1]).unwrap();
        let orders = vec![in_group(3, 1.0), in_group(3, 0.1)];

        nuclide
            .set_scatter_block(1, ScatterKind::Elastic, 0, orders, &widths)
            .unwrap();

        assert_eq!(nuclide.metadata.ints("IDSCT").unwrap().as_slice(), [0, 100]);
        assert_eq!(nuclide.metadata.ints("LORD").unwrap().as_slice(), [0, 2]);
        assert_eq!(nuclide.band_widths(1).unwrap(), widths);
        assert_eq!(nuclide.metadata.ints("JBAND").unwrap().row(0), Some(&[0, 0, 0][..]));
        assert_eq!(nuclide.num_records().unwrap(), 3);
        assert_eq!(nuclide.max_order(), 1);

        let block = nuclide.get_scatter_block(1).unwrap();
        assert_eq!(block.kind(), Some(ScatterKind::Elastic));
        assert_eq!(block.order(1).unwrap().get(2, 2), 0.1);
        // stored in the band, so explicit zeros below the diagonal
        assert_eq!(block.order(0).unwrap().nnz(), 5);

        assert!(nuclide
            .set_scatter_block(2, ScatterKind::Total, 0, vec![], &widths)
            .is_err());
    }

    #[test]
    fn n2n_production() {
        let block = ScatterBlock {
            idsct: ScatterKind::N2n.idsct(0),
            orders: vec![in_group(2, 0.25)],
        };
        assert_eq!(block.kind(), Some(ScatterKind::N2n));
        assert_eq!(block.production()[0].get(1, 1), 0.5);
        assert_eq!(block.orders[0].get(1, 1), 0.25);
    }
}

//! Per-step field cache.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use sd_core::{ISnap, Resolution};
use tracing::{debug, warn};

use crate::catalog::{FieldCatalogEntry, RecordKind};
use crate::dataset::SimulationDataset;
use crate::geometry::Geometry;
use crate::types::{Field, FieldHeader};

/// Fields of one step, loaded one record file at a time.
///
/// Loading any field of a bundled record caches all of its siblings, so a
/// record file is parsed at most once per step. Record kinds found missing
/// are remembered as well.
#[derive(Debug, Default)]
pub struct FieldCache {
    fields: RefCell<HashMap<&'static str, Rc<Field>>>,
    missing: RefCell<HashSet<RecordKind>>,
    header: RefCell<Option<Rc<FieldHeader>>>,
    geom: RefCell<Resolution<Rc<Geometry>>>,
}

impl FieldCache {
    pub fn cached(&self, name: &str) -> Option<Rc<Field>> {
        self.fields.borrow().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.borrow().is_empty()
    }

    pub(crate) fn load(
        &self,
        sdat: &SimulationDataset,
        entry: &FieldCatalogEntry,
        isnap: ISnap,
    ) -> Option<Rc<Field>> {
        if let Some(field) = self.cached(entry.name) {
            return Some(field);
        }
        if self.missing.borrow().contains(&entry.kind) {
            return None;
        }

        let path = sdat.record_path(entry.kind, isnap);
        debug!(field = entry.name, path = %path.display(), "loading field record");
        let (header, arrays) = match sdat.parser().parse_full(&path) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => {
                debug!(path = %path.display(), "field record not found");
                self.missing.borrow_mut().insert(entry.kind);
                return None;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable field record");
                self.missing.borrow_mut().insert(entry.kind);
                return None;
            }
        };

        let names = entry.kind.field_names();
        if arrays.len() < names.len() {
            warn!(
                path = %path.display(),
                expected = names.len(),
                found = arrays.len(),
                "field record holds fewer arrays than its kind declares"
            );
        }

        {
            let mut captured = self.header.borrow_mut();
            if captured.is_none() {
                *captured = Some(Rc::new(header));
            }
        }
        let field = {
            let mut fields = self.fields.borrow_mut();
            for (name, array) in names.iter().copied().zip(arrays) {
                fields.entry(name).or_insert_with(|| Rc::new(array));
            }
            fields.get(entry.name).cloned()
        };
        if field.is_none() {
            // record parsed but short; its unfilled names stay missing
            self.missing.borrow_mut().insert(entry.kind);
        }
        field
    }

    pub(crate) fn geometry(
        &self,
        sdat: &SimulationDataset,
        isnap: Option<ISnap>,
    ) -> Option<Rc<Geometry>> {
        let current = self.geom.borrow().clone();
        if !current.is_unresolved() {
            return current.value();
        }

        // without a snapshot there is nothing to settle yet
        let isnap = isnap?;
        let r_cmb = sdat.config().par.geometry.r_cmb;
        let geom = self
            .header_for(sdat, isnap)
            .map(|header| Rc::new(Geometry::resolve(header, sdat.domain_shape(), r_cmb)));
        self.geom.borrow_mut().settle(geom.clone());
        geom
    }

    /// Header captured by a field load, or the first one found among the
    /// scanned record kinds.
    fn header_for(&self, sdat: &SimulationDataset, isnap: ISnap) -> Option<Rc<FieldHeader>> {
        let captured = self.header.borrow().clone();
        if captured.is_some() {
            return captured;
        }
        for &kind in sdat.scan() {
            if self.missing.borrow().contains(&kind) {
                continue;
            }
            let path = sdat.record_path(kind, isnap);
            match sdat.parser().parse_header(&path) {
                Ok(Some(header)) => {
                    debug!(path = %path.display(), "geometry header found");
                    let header = Rc::new(header);
                    *self.header.borrow_mut() = Some(header.clone());
                    return Some(header);
                }
                Ok(None) => {
                    self.missing.borrow_mut().insert(kind);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "unreadable field header");
                    self.missing.borrow_mut().insert(kind);
                }
            }
        }
        None
    }
}

//! A grid of independent viewers.

use neuroscope_core::{EntityId, ObjectId, Result, ViewerError, Visual};
use neuroscope_render::Camera;

use crate::viewer::{AddOptions, Viewer};

/// Several viewers laid out in rows and columns.
///
/// Each cell has its own scene and camera. With linking enabled, every
/// cell follows the first cell's camera, and navigating any cell moves
/// the rest along with it.
#[derive(Debug)]
pub struct Browser {
    viewers: Vec<Viewer>,
    rows: usize,
    cols: usize,
    linked: bool,
}

impl Browser {
    /// Creates a `rows` x `cols` grid, building each cell with `make_viewer`.
    pub fn new(
        rows: usize,
        cols: usize,
        linked: bool,
        mut make_viewer: impl FnMut() -> Viewer,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ViewerError::InvalidInput(format!(
                "browser grid must be at least 1x1, got {rows}x{cols}"
            )));
        }
        let viewers = (0..rows * cols).map(|_| make_viewer()).collect();
        log::info!("browser with {rows}x{cols} viewers");
        Ok(Self {
            viewers,
            rows,
            cols,
            linked,
        })
    }

    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }

    /// `(rows, cols)` of the grid.
    pub fn grid(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row and column of viewer `index`.
    pub fn cell(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.viewers.len()).then(|| (index / self.cols, index % self.cols))
    }

    pub fn viewer(&self, index: usize) -> Option<&Viewer> {
        self.viewers.get(index)
    }

    pub fn viewer_mut(&mut self, index: usize) -> Option<&mut Viewer> {
        self.viewers.get_mut(index)
    }

    fn checked_mut(&mut self, index: usize) -> Result<&mut Viewer> {
        let len = self.viewers.len();
        self.viewers
            .get_mut(index)
            .ok_or_else(|| ViewerError::InvalidInput(format!("no viewer {index} (have {len})")))
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Links or unlinks the cameras. Linking snaps every cell to the first.
    pub fn set_linked(&mut self, linked: bool) {
        self.linked = linked;
        self.sync_cameras();
    }

    /// Adds visuals to one viewer.
    pub fn add(&mut self, visuals: Vec<Visual>, viewer: usize, options: &AddOptions) -> Result<Vec<ObjectId>> {
        let added = self.checked_mut(viewer)?.add(visuals, options)?;
        self.sync_cameras();
        Ok(added)
    }

    /// Adds a copy of the visuals to every viewer.
    pub fn add_to_all(&mut self, visuals: &[Visual], options: &AddOptions) -> Result<()> {
        if visuals.is_empty() {
            return Err(ViewerError::NoVisualsGenerated);
        }
        for viewer in &mut self.viewers {
            viewer.add(visuals.iter().map(Visual::duplicate).collect(), options)?;
        }
        self.sync_cameras();
        Ok(())
    }

    /// Spreads entities over the viewers round robin, one entity per cell
    /// in turn. Visuals of the same entity stay together.
    pub fn add_and_divide(&mut self, visuals: Vec<Visual>, options: &AddOptions) -> Result<()> {
        if visuals.is_empty() {
            return Err(ViewerError::NoVisualsGenerated);
        }

        let mut units: Vec<(Option<EntityId>, Vec<Visual>)> = Vec::new();
        for visual in visuals {
            let entity = visual.entity_id().cloned();
            match units
                .iter_mut()
                .find(|(e, _)| entity.is_some() && *e == entity)
            {
                Some((_, group)) => group.push(visual),
                None => units.push((entity, vec![visual])),
            }
        }

        let n = self.viewers.len();
        for (i, (_, group)) in units.into_iter().enumerate() {
            self.viewers[i % n].add(group, options)?;
        }
        self.sync_cameras();
        Ok(())
    }

    /// Visuals attached to viewer `index`.
    pub fn get_visuals(&self, index: usize) -> Result<&[Visual]> {
        self.viewers
            .get(index)
            .map(|v| v.registry().all_visuals())
            .ok_or_else(|| ViewerError::InvalidInput(format!("no viewer {index}")))
    }

    /// Fits viewer `index`'s camera to its scene.
    pub fn center_camera(&mut self, index: usize) -> Result<()> {
        self.checked_mut(index)?.center_camera();
        if index == 0 {
            self.sync_cameras();
        }
        Ok(())
    }

    /// Applies a navigation to viewer `index`'s camera, then propagates
    /// that camera to the others if linked.
    pub fn navigate(&mut self, index: usize, f: impl FnOnce(&mut Camera)) -> Result<()> {
        f(self.checked_mut(index)?.camera_mut());
        self.sync_from(index);
        Ok(())
    }

    /// Detaches everything from every viewer.
    pub fn clear(&mut self) {
        for viewer in &mut self.viewers {
            viewer.clear();
        }
    }

    fn sync_cameras(&mut self) {
        self.sync_from(0);
    }

    fn sync_from(&mut self, source: usize) {
        if !self.linked {
            return;
        }
        let Some(state) = self.viewers.get(source).map(|v| v.camera().state()) else {
            return;
        };
        for (i, viewer) in self.viewers.iter_mut().enumerate() {
            if i != source {
                viewer.camera_mut().set_state(state);
            }
        }
    }
}

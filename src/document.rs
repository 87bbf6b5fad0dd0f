//! IGES document structure

use crate::assembly::CompositeCurveAssembler;
use crate::entities::{CurveRef, EntityType};
use crate::error::{IgesError, Result};
use crate::io::iges::global::GlobalSection;
use crate::io::iges::IgesReaderConfiguration;
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::Transform;
use indexmap::IndexMap;

/// Directory sequence number to arena index, in file order
pub type PointerTable = IndexMap<u32, usize, ahash::RandomState>;

/// Create an empty pointer table
pub fn new_pointer_table() -> PointerTable {
    IndexMap::with_hasher(ahash::RandomState::new())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// A loaded IGES file
///
/// Entities live in a single arena in directory order. Pointers between
/// entities are arena indices once the document has been resolved.
#[derive(Debug, Clone)]
pub struct IgesDocument {
    /// Start section text, one line per record
    pub start_section: String,
    /// Global section
    pub global: GlobalSection,
    /// Conditions encountered while reading that did not abort the load
    pub notifications: NotificationCollection,
    entities: Vec<EntityType>,
    pointer_table: PointerTable,
    absorbed: Vec<bool>,
}

impl IgesDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            start_section: String::new(),
            global: GlobalSection::default(),
            notifications: NotificationCollection::new(),
            entities: Vec::new(),
            pointer_table: new_pointer_table(),
            absorbed: Vec::new(),
        }
    }

    /// Assemble a document from the output of the section reader
    pub(crate) fn from_parts(
        start_section: String,
        global: GlobalSection,
        entities: Vec<EntityType>,
        pointer_table: PointerTable,
        notifications: NotificationCollection,
    ) -> Self {
        let absorbed = vec![false; entities.len()];
        Self {
            start_section,
            global,
            notifications,
            entities,
            pointer_table,
            absorbed,
        }
    }

    /// All entities in directory order
    pub fn entities(&self) -> &[EntityType] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, index: usize) -> Option<&EntityType> {
        self.entities.get(index)
    }

    pub fn entity_mut(&mut self, index: usize) -> Option<&mut EntityType> {
        self.entities.get_mut(index)
    }

    /// Arena index of the entity whose directory entry starts at `sequence`
    pub fn index_of(&self, sequence: u32) -> Option<usize> {
        self.pointer_table.get(&sequence).copied()
    }

    pub fn entity_by_sequence(&self, sequence: u32) -> Option<&EntityType> {
        self.index_of(sequence).and_then(|i| self.entities.get(i))
    }

    pub fn pointer_table(&self) -> &PointerTable {
        &self.pointer_table
    }

    pub fn global(&self) -> &GlobalSection {
        &self.global
    }

    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Whether the entity is a member of a composite curve or ordered group
    pub fn is_absorbed(&self, index: usize) -> bool {
        self.absorbed.get(index).copied().unwrap_or(false)
    }

    /// Arena indices of entities that are not members of another entity
    pub fn top_level_indices(&self) -> Vec<usize> {
        (0..self.entities.len())
            .filter(|&i| !self.is_absorbed(i))
            .collect()
    }

    /// Entities that are not members of another entity, in file order
    pub fn top_level(&self) -> impl Iterator<Item = &EntityType> + '_ {
        self.entities
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.is_absorbed(*i))
            .map(|(_, e)| e)
    }

    /// Curve view of an entity, following composite members
    pub fn curve(&self, index: usize) -> Option<CurveRef<'_>> {
        let entity = self.entities.get(index)?;
        if let Some(curve) = entity.as_curve() {
            return Some(CurveRef::Single(curve));
        }
        let chain = entity.as_chain()?;
        let children = chain
            .children
            .iter()
            .map(|&child| self.curve(child))
            .collect::<Option<Vec<_>>>()?;
        Some(CurveRef::Chain {
            children,
            closed: chain.closed,
        })
    }

    /// Top-level curves and chains, in file order
    pub fn curves(&self) -> impl Iterator<Item = CurveRef<'_>> + '_ {
        self.top_level_indices()
            .into_iter()
            .filter_map(move |i| self.curve(i))
    }

    /// Reverse a curve, or a chain together with all of its members
    ///
    /// Returns `false` if the entity has no orientation.
    pub fn reverse(&mut self, index: usize) -> bool {
        let Some(entity) = self.entities.get_mut(index) else {
            return false;
        };
        if let Some(curve) = entity.as_curve_mut() {
            curve.reverse();
            return true;
        }
        let Some(chain) = entity.as_chain_mut() else {
            return false;
        };
        chain.children.reverse();
        for child in chain.children.clone() {
            self.reverse(child);
        }
        true
    }

    /// Second pass over a freshly read document: resolve transform and
    /// member pointers, place curves in model space, and stitch composite
    /// members into chains
    pub fn resolve_references(&mut self, config: &IgesReaderConfiguration) -> Result<()> {
        // --- 1. Transform pointers ---
        self.resolve_transform_pointers()?;

        // --- 2. Composed transform of every entity ---
        let mut cache = vec![None; self.entities.len()];
        let mut visit = vec![Visit::New; self.entities.len()];
        for index in 0..self.entities.len() {
            self.matrix_transform(index, &mut cache, &mut visit)?;
        }
        let placement: Vec<Transform> = (0..self.entities.len())
            .map(|i| {
                self.entities[i]
                    .directory()
                    .transform_index
                    .and_then(|t| cache[t])
                    .unwrap_or_default()
            })
            .collect();

        // --- 3. Member pointers ---
        self.resolve_member_pointers()?;
        let order = self.chain_order()?;

        // --- 4. Curves into model space ---
        for index in 0..self.entities.len() {
            if let EntityType::RationalBSplineCurve(spline) = &mut self.entities[index] {
                spline.set_length_samples(config.length_samples);
            }
            if !self.absorbed[index] {
                self.place(index, &Transform::identity(), &placement);
            }
        }

        // --- 5. Stitch chains, innermost first ---
        let assembler = CompositeCurveAssembler::new(config.join_tolerance);
        for index in order {
            self.assemble_chain(index, &assembler);
        }
        Ok(())
    }

    fn resolve_transform_pointers(&mut self) -> Result<()> {
        for index in 0..self.entities.len() {
            let directory = self.entities[index].directory();
            if !directory.has_transform() {
                continue;
            }
            let pointer = directory.transform;
            let referrer = directory.sequence;
            let linked_early = directory.transform_index.is_some();

            let target = u32::try_from(pointer)
                .ok()
                .and_then(|p| self.index_of(p))
                .ok_or(IgesError::UnresolvedPointer {
                    pointer: pointer as i64,
                    referrer,
                    context: "transformation matrix",
                })?;
            if !matches!(self.entities[target], EntityType::TransformationMatrix(_)) {
                return Err(IgesError::UnresolvedPointer {
                    pointer: pointer as i64,
                    referrer,
                    context: "transformation matrix (target is another entity type)",
                });
            }
            if !linked_early {
                self.notifications.notify_entity(
                    NotificationType::Warning,
                    referrer,
                    format!("transformation matrix DE {} is defined after its user", pointer),
                );
            }
            self.entities[index].directory_mut().transform_index = Some(target);
        }
        Ok(())
    }

    /// Composed transform of a transformation matrix, following the chain
    /// of matrices it references; `None` for other entity types
    fn matrix_transform(
        &self,
        index: usize,
        cache: &mut Vec<Option<Transform>>,
        visit: &mut Vec<Visit>,
    ) -> Result<Option<Transform>> {
        let EntityType::TransformationMatrix(matrix) = &self.entities[index] else {
            return Ok(None);
        };
        match visit[index] {
            Visit::Done => return Ok(cache[index]),
            Visit::Active => {
                return Err(IgesError::CircularReference {
                    sequence: matrix.directory.sequence,
                })
            }
            Visit::New => {}
        }
        visit[index] = Visit::Active;
        let own = matrix.matrix;
        let composed = match matrix.directory.transform_index {
            Some(parent) => match self.matrix_transform(parent, cache, visit)? {
                Some(outer) => own.then(&outer),
                None => own,
            },
            None => own,
        };
        visit[index] = Visit::Done;
        cache[index] = Some(composed);
        Ok(Some(composed))
    }

    fn resolve_member_pointers(&mut self) -> Result<()> {
        for index in 0..self.entities.len() {
            let referrer = self.entities[index].sequence();
            let Some(chain) = self.entities[index].as_chain() else {
                continue;
            };
            let children = chain
                .pointers
                .iter()
                .map(|&pointer| {
                    u32::try_from(pointer)
                        .ok()
                        .and_then(|p| self.index_of(p))
                        .ok_or(IgesError::UnresolvedPointer {
                            pointer,
                            referrer,
                            context: "composite member",
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            for &child in &children {
                self.absorbed[child] = true;
            }
            if let Some(chain) = self.entities[index].as_chain_mut() {
                chain.children = children;
            }
        }
        Ok(())
    }

    /// Chains in an order where every nested chain precedes its parent
    fn chain_order(&self) -> Result<Vec<usize>> {
        let mut visit = vec![Visit::New; self.entities.len()];
        let mut order = Vec::new();
        for index in 0..self.entities.len() {
            self.visit_chain(index, &mut visit, &mut order)?;
        }
        Ok(order)
    }

    fn visit_chain(&self, index: usize, visit: &mut [Visit], order: &mut Vec<usize>) -> Result<()> {
        let Some(chain) = self.entities[index].as_chain() else {
            return Ok(());
        };
        match visit[index] {
            Visit::Done => return Ok(()),
            Visit::Active => {
                return Err(IgesError::CircularReference {
                    sequence: self.entities[index].sequence(),
                })
            }
            Visit::New => {}
        }
        visit[index] = Visit::Active;
        for &child in &chain.children {
            self.visit_chain(child, visit, order)?;
        }
        visit[index] = Visit::Done;
        order.push(index);
        Ok(())
    }

    /// Attach model-space transforms, passing a chain's own transform down
    /// to its members
    fn place(&mut self, index: usize, outer: &Transform, placement: &[Transform]) {
        let world = placement[index].then(outer);
        if let Some(curve) = self.entities[index].as_curve_mut() {
            curve.set_transform(world);
            return;
        }
        let children = match self.entities[index].as_chain() {
            Some(chain) => chain.children.clone(),
            None => return,
        };
        for child in children {
            self.place(child, &world, placement);
        }
    }

    fn assemble_chain(&mut self, index: usize, assembler: &CompositeCurveAssembler) {
        let sequence = self.entities[index].sequence();
        let children = match self.entities[index].as_chain() {
            Some(chain) => chain.children.clone(),
            None => return,
        };

        let mut endpoints = Vec::with_capacity(children.len());
        for &child in &children {
            match self.curve(child).and_then(|c| c.endpoints()) {
                Some(ends) => endpoints.push(ends),
                None => {
                    self.notifications.notify_entity(
                        NotificationType::Warning,
                        sequence,
                        format!(
                            "member DE {} has no curve geometry; members kept in file order",
                            self.entities[child].sequence()
                        ),
                    );
                    return;
                }
            }
        }

        let assembly = assembler.assemble(&endpoints);
        for &slot in &assembly.ambiguous {
            self.notifications.notify_entity(
                NotificationType::Warning,
                sequence,
                format!(
                    "{} of member DE {} meets more than one other member",
                    if slot % 2 == 0 { "start" } else { "end" },
                    self.entities[children[slot / 2]].sequence()
                ),
            );
        }
        if !assembly.unreached.is_empty() {
            let members: Vec<String> = assembly
                .unreached
                .iter()
                .map(|&c| self.entities[children[c]].sequence().to_string())
                .collect();
            self.notifications.notify_entity(
                NotificationType::Warning,
                sequence,
                format!("members DE {} do not join the chain", members.join(", ")),
            );
        }

        let mut ordered = Vec::with_capacity(children.len());
        for step in &assembly.steps {
            let child = children[step.child];
            if step.reversed {
                self.reverse(child);
            }
            ordered.push(child);
        }
        ordered.extend(assembly.unreached.iter().map(|&c| children[c]));

        if let Some(chain) = self.entities[index].as_chain_mut() {
            chain.children = ordered;
            chain.closed = assembly.closed;
            chain.assembled = true;
        }
    }
}

impl Default for IgesDocument {
    fn default() -> Self {
        Self::new()
    }
}

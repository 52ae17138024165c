use crate::annotations::{GeneGroup, GeneId};
use crate::term::{GoTermId, TermGroup};
use crate::DEFAULT_NUM_GENES;

#[derive(Debug)]
pub(crate) struct GoTermInternal {
    id: GoTermId,
    name: String,
    parents: TermGroup,
    children: TermGroup,
    genes: GeneGroup,
}

impl GoTermInternal {
    pub fn new(name: String, id: GoTermId) -> GoTermInternal {
        GoTermInternal {
            id,
            name,
            parents: TermGroup::new(),
            children: TermGroup::new(),
            genes: GeneGroup::with_capacity(DEFAULT_NUM_GENES),
        }
    }

    pub fn id(&self) -> &GoTermId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &TermGroup {
        &self.parents
    }

    pub fn parents_mut(&mut self) -> &mut TermGroup {
        &mut self.parents
    }

    pub fn children(&self) -> &TermGroup {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut TermGroup {
        &mut self.children
    }

    pub fn genes(&self) -> &GeneGroup {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut GeneGroup {
        &mut self.genes
    }

    pub fn add_parent(&mut self, parent_id: GoTermId) -> bool {
        self.parents.insert(parent_id)
    }

    pub fn add_child(&mut self, child_id: GoTermId) -> bool {
        self.children.insert(child_id)
    }

    pub fn add_gene(&mut self, gene_id: GeneId) -> bool {
        self.genes.insert(gene_id)
    }
}

//! 空间结构树
//!
//! 外部模型加载器给出嵌套的 [`StoreyNode`]（项目 → 场地 → 建筑 → 楼层 → 构件），
//! 这里把它转换为基于索引的只读树 [`SpatialTree`]。
//!
//! 楼层导出时需要把子节点的子节点（例如幕墙下的嵌板和竖梃）并入楼层的直接子节点列表。
//! 该展开只处理一层，结果是一份临时拷贝，原树不变。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// IFC 实例编号
pub type ExpressId = u32;

/// 楼层实体类型名
pub const STOREY_TYPE: &str = "IFCBUILDINGSTOREY";

/// 外部空间结构节点（嵌套形式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreyNode {
    pub express_id: ExpressId,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<StoreyNode>,
}

impl StoreyNode {
    pub fn new(express_id: ExpressId, kind: impl Into<String>) -> Self {
        Self {
            express_id,
            kind: kind.into(),
            name: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<StoreyNode>) -> Self {
        self.children = children;
        self
    }
}

/// 树节点索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// 树节点
#[derive(Debug, Clone)]
pub struct SpatialNode {
    pub express_id: ExpressId,
    pub kind: String,
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// 空间结构查询错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpatialError {
    #[error("Unknown storey: {0}")]
    UnknownStorey(ExpressId),
}

/// 只读空间结构树
#[derive(Debug, Clone)]
pub struct SpatialTree {
    nodes: Vec<SpatialNode>,
    index: HashMap<ExpressId, NodeId>,
}

impl SpatialTree {
    /// 从嵌套结构构建
    pub fn from_root(root: &StoreyNode) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        tree.insert(root, None);
        tree
    }

    fn insert(&mut self, node: &StoreyNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SpatialNode {
            express_id: node.express_id,
            kind: node.kind.clone(),
            name: node.name.clone(),
            parent,
            children: Vec::with_capacity(node.children.len()),
        });
        // 重复编号以先出现的为准
        self.index.entry(node.express_id).or_insert(id);

        for child in &node.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SpatialNode {
        &self.nodes[id.0]
    }

    pub fn find(&self, express_id: ExpressId) -> Option<NodeId> {
        self.index.get(&express_id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 所有楼层节点（先序）
    pub fn storeys(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.node(*id).kind.eq_ignore_ascii_case(STOREY_TYPE))
            .collect()
    }

    /// 楼层的直接子节点，后接每个子节点的子节点（只展开一层）
    pub fn flattened_children(&self, storey: ExpressId) -> Result<Vec<ExpressId>, SpatialError> {
        let id = self.find(storey).ok_or(SpatialError::UnknownStorey(storey))?;
        let direct = &self.node(id).children;

        let mut flattened: Vec<ExpressId> =
            direct.iter().map(|c| self.node(*c).express_id).collect();
        for child in direct {
            flattened.extend(
                self.node(*child)
                    .children
                    .iter()
                    .map(|g| self.node(*g).express_id),
            );
        }
        Ok(flattened)
    }

    /// 楼层导出所用的构件编号集合
    pub fn storey_element_ids(&self, storey: ExpressId) -> Result<BTreeSet<ExpressId>, SpatialError> {
        Ok(self.flattened_children(storey)?.into_iter().collect())
    }

    /// 树形大纲，每行 `TYPE - expressID`，按深度缩进两个空格
    pub fn outline(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            lines.push(format!("{}{} - {}", "  ".repeat(depth), node.kind, node.express_id));
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> StoreyNode {
        StoreyNode::new(1, "IFCPROJECT").with_children(vec![StoreyNode::new(2, "IFCSITE")
            .with_children(vec![StoreyNode::new(3, "IFCBUILDING").with_children(vec![
                StoreyNode::new(10, "IFCBUILDINGSTOREY").with_children(vec![
                    StoreyNode::new(11, "IFCWALLSTANDARDCASE"),
                    StoreyNode::new(12, "IFCCURTAINWALL").with_children(vec![
                        StoreyNode::new(13, "IFCPLATE"),
                        StoreyNode::new(14, "IFCMEMBER").with_children(vec![
                            StoreyNode::new(15, "IFCBUILDINGELEMENTPART"),
                        ]),
                    ]),
                    StoreyNode::new(16, "IFCSLAB"),
                ]),
                StoreyNode::new(20, "IFCBUILDINGSTOREY"),
            ])])])
    }

    #[test]
    fn test_flatten_one_level() {
        let tree = SpatialTree::from_root(&sample_project());

        let flattened = tree.flattened_children(10).unwrap();
        assert_eq!(flattened, vec![11, 12, 16, 13, 14]);

        // 只展开一层：15 不包含在内
        let ids = tree.storey_element_ids(10).unwrap();
        assert!(!ids.contains(&15));
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_flatten_does_not_mutate_tree() {
        let tree = SpatialTree::from_root(&sample_project());
        let before = tree.node(tree.find(10).unwrap()).children.len();

        tree.flattened_children(10).unwrap();
        tree.flattened_children(10).unwrap();

        assert_eq!(tree.node(tree.find(10).unwrap()).children.len(), before);
        assert_eq!(tree.len(), 11);
    }

    #[test]
    fn test_unknown_storey() {
        let tree = SpatialTree::from_root(&sample_project());
        assert_eq!(
            tree.storey_element_ids(999),
            Err(SpatialError::UnknownStorey(999))
        );
        assert!(tree.storey_element_ids(20).unwrap().is_empty());
    }

    #[test]
    fn test_storeys_and_parents() {
        let tree = SpatialTree::from_root(&sample_project());
        let storeys: Vec<ExpressId> = tree
            .storeys()
            .into_iter()
            .map(|id| tree.node(id).express_id)
            .collect();
        assert_eq!(storeys, vec![10, 20]);

        let plate = tree.node(tree.find(13).unwrap());
        assert_eq!(tree.node(plate.parent.unwrap()).express_id, 12);
        assert!(tree.node(tree.root()).parent.is_none());
    }

    #[test]
    fn test_outline() {
        let tree = SpatialTree::from_root(&sample_project());
        let outline = tree.outline();

        assert_eq!(outline[0], "IFCPROJECT - 1");
        assert_eq!(outline[4], "        IFCWALLSTANDARDCASE - 11");
        assert_eq!(outline.len(), tree.len());
    }

    #[test]
    fn test_deserialize_nested() {
        let json = r#"{"expressId": 1, "type": "IFCPROJECT", "children": [
            {"expressId": 2, "type": "IFCBUILDINGSTOREY", "children": [{"expressId": 3}]}
        ]}"#;
        let root: StoreyNode = serde_json::from_str(json).unwrap();
        let tree = SpatialTree::from_root(&root);
        assert_eq!(tree.flattened_children(2).unwrap(), vec![3]);
    }
}

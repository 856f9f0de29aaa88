use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Тип примитива
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Torus,
}

impl PrimitiveKind {
    /// Все доступные примитивы (порядок кнопок на панели инструментов)
    pub fn all() -> &'static [PrimitiveKind] {
        &[
            PrimitiveKind::Cube,
            PrimitiveKind::Sphere,
            PrimitiveKind::Cylinder,
            PrimitiveKind::Cone,
            PrimitiveKind::Torus,
        ]
    }

    /// Отображаемое имя
    pub fn label(&self) -> &'static str {
        match self {
            PrimitiveKind::Cube => "Cube",
            PrimitiveKind::Sphere => "Sphere",
            PrimitiveKind::Cylinder => "Cylinder",
            PrimitiveKind::Cone => "Cone",
            PrimitiveKind::Torus => "Torus",
        }
    }
}

/// Трансформация объекта (позиция, углы Эйлера XYZ в радианах, масштаб)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Единичная трансформация, смещённая в точку `position`
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// Материал объекта: базовый цвет и необязательное свечение подсветки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Базовый цвет RGB (0.0 - 1.0)
    pub color: [f32; 3],
    /// Эмиссионный оттенок; `Some` только у подсвеченного (выделенного) объекта
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive: Option<[f32; 3]>,
}

impl Material {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive: None,
        }
    }

    /// Подсвеченный вариант: тот же базовый цвет плюс эмиссионный оттенок
    pub fn highlighted(&self, tint: [f32; 3]) -> Self {
        Self {
            color: self.color,
            emissive: Some(tint),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.emissive.is_some()
    }

    /// Итоговый цвет для отрисовки (базовый цвет + свечение, с насыщением)
    pub fn shaded_color(&self) -> [f32; 3] {
        let e = self.emissive.unwrap_or([0.0; 3]);
        [
            (self.color[0] + e[0]).min(1.0),
            (self.color[1] + e[1]).min(1.0),
            (self.color[2] + e[2]).min(1.0),
        ]
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([0.7, 0.7, 0.72])
    }
}

/// Объект сцены
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: PrimitiveKind,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub material: Material,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub selectable: bool,
}

fn default_true() -> bool {
    true
}

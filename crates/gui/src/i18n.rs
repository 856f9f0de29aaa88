use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lang {
    Ru,
    En,
}

impl Lang {
    /// Language for a settings code; anything unknown is English
    pub fn from_code(code: &str) -> Self {
        match code {
            "ru" => Lang::Ru,
            _ => Lang::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::En => "en",
        }
    }
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(1); // 1=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        0 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.export_png" => if ru { "Экспорт кадра PNG  Ctrl+E" } else { "Export frame PNG  Ctrl+E" },
        "menu.export_dir" => if ru { "Папка экспорта..." } else { "Export folder..." },
        "menu.export_dir_title" => if ru { "Папка для экспорта кадров" } else { "Folder for exported frames" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.edit" => if ru { "Правка" } else { "Edit" },
        "menu.duplicate" => if ru { "Дублировать  Ctrl+D" } else { "Duplicate  Ctrl+D" },
        "menu.delete" => if ru { "Удалить  Del" } else { "Delete  Del" },
        "menu.deselect_all" => if ru { "Снять выделение  Esc" } else { "Deselect  Esc" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.scene_list" => if ru { "Список объектов" } else { "Object list" },
        "menu.status_bar" => if ru { "Строка состояния" } else { "Status bar" },
        "menu.reset_camera" => if ru { "Сбросить камеру  Home" } else { "Reset camera  Home" },
        "menu.focus" => if ru { "К выделенному  F" } else { "Focus selection  F" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        "menu.create" => if ru { "Создать" } else { "Create" },
        "menu.settings" => if ru { "Настройки" } else { "Settings" },
        "menu.preferences" => if ru { "Параметры..." } else { "Preferences..." },

        // ── Primitives ──────────────────────────────────────
        "prim.cube" => if ru { "Куб" } else { "Cube" },
        "prim.sphere" => if ru { "Сфера" } else { "Sphere" },
        "prim.cylinder" => if ru { "Цилиндр" } else { "Cylinder" },
        "prim.cone" => if ru { "Конус" } else { "Cone" },
        "prim.torus" => if ru { "Тор" } else { "Torus" },

        // ── Toolbar ─────────────────────────────────────────
        "tb.add" => if ru { "Добавить:" } else { "Add:" },
        "tb.duplicate" => if ru { "Дублировать" } else { "Duplicate" },
        "tb.delete" => if ru { "Удалить" } else { "Delete" },
        "tb.export" => if ru { "Снимок" } else { "Snapshot" },
        "tb.export_hint" => if ru { "Сохранить текущий вид в PNG" } else { "Save the current view as PNG" },
        "tb.reset_camera" => if ru { "Камера" } else { "Home" },

        // ── Object list ─────────────────────────────────────
        "scene.title" => if ru { "Объекты" } else { "Objects" },
        "scene.empty" => if ru { "Сцена пуста" } else { "Scene is empty" },
        "scene.hide" => if ru { "Скрыть" } else { "Hide" },
        "scene.show" => if ru { "Показать" } else { "Show" },
        "scene.duplicate" => if ru { "Дублировать" } else { "Duplicate" },
        "scene.delete" => if ru { "Удалить" } else { "Delete" },
        "scene.focus" => if ru { "Показать в виде" } else { "Focus" },
        "scene.color" => if ru { "Цвет" } else { "Color" },

        // ── Status bar ──────────────────────────────────────
        "status.objects" => if ru { "Объектов:" } else { "Objects:" },
        "status.selected" => if ru { "Выбрано:" } else { "Selected:" },
        "status.ready" => if ru { "Готово" } else { "Ready" },
        "status.distance" => if ru { "Дистанция:" } else { "Distance:" },
        "status.export_pending" => if ru { "Сохранение кадра..." } else { "Saving frame..." },
        "status.export_saved" => if ru { "Сохранено:" } else { "Saved:" },
        "status.export_failed" => if ru { "Ошибка экспорта:" } else { "Export failed:" },

        // ── Viewport ────────────────────────────────────────
        "viewport.no_surface" => if ru { "Область просмотра недоступна" } else { "Viewport unavailable" },
        "viewport.no_gl" => if ru { "OpenGL недоступен" } else { "OpenGL not available" },
        "viewport.nav_hint" => if ru {
            "ЛКМ: вращение | ПКМ: сдвиг | Колесо: масштаб | Клик: выбор"
        } else {
            "LMB: orbit | RMB: pan | Wheel: zoom | Click: select"
        },
        "overlay.distance" => if ru { "Дист:" } else { "Dist:" },
        "overlay.azimuth" => if ru { "Азимут:" } else { "Azimuth:" },
        "overlay.polar" => if ru { "Полярный:" } else { "Polar:" },

        // ── Settings window ─────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },

        "settings.camera" => if ru { "Камера" } else { "Camera" },
        "settings.damping" => if ru { "Инерция" } else { "Damping" },
        "settings.damping_factor" => if ru { "Коэффициент инерции" } else { "Damping factor" },
        "settings.min_distance" => if ru { "Мин. дистанция" } else { "Min distance" },
        "settings.max_distance" => if ru { "Макс. дистанция" } else { "Max distance" },
        "settings.fov" => if ru { "Угол обзора" } else { "Field of view" },
        "settings.zoom_step" => if ru { "Шаг масштаба" } else { "Zoom step" },
        "settings.clamp_polar" => if ru { "Не переходить через полюс" } else { "Stop at the poles" },

        "settings.scene" => if ru { "Сцена" } else { "Scene" },
        "settings.id_strategy" => if ru { "Идентификаторы" } else { "Object ids" },
        "settings.spawn_extent" => if ru { "Область появления" } else { "Spawn extent" },
        "settings.restart_hint" => if ru { "Применяется после перезапуска" } else { "Takes effect after restart" },

        "settings.grid" => if ru { "Сетка" } else { "Grid" },
        "settings.grid_visible" => if ru { "Показывать сетку" } else { "Show grid" },
        "settings.grid_size" => if ru { "Шаг сетки" } else { "Cell size" },
        "settings.grid_range" => if ru { "Размер сетки" } else { "Grid range" },
        "settings.grid_opacity" => if ru { "Прозрачность" } else { "Opacity" },

        "settings.viewport" => if ru { "Вид" } else { "Viewport" },
        "settings.bg_color" => if ru { "Цвет фона" } else { "Background" },
        "settings.highlight" => if ru { "Цвет выделения" } else { "Highlight tint" },
        "settings.axes_visible" => if ru { "Показывать оси" } else { "Show axes" },
        "settings.camera_info" => if ru { "Данные камеры" } else { "Camera readout" },

        "settings.export" => if ru { "Экспорт" } else { "Export" },
        "settings.multiplier" => if ru { "Множитель плотности" } else { "Density multiplier" },
        "settings.hard_cap" => if ru { "Предел плотности" } else { "Density cap" },
        "settings.output_dir" => if ru { "Папка" } else { "Folder" },
        "settings.browse" => if ru { "Обзор..." } else { "Browse..." },

        "settings.ui" => if ru { "Интерфейс" } else { "Interface" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },

        "settings.apply" => if ru { "Применить" } else { "Apply" },
        "settings.reset" => if ru { "Сбросить" } else { "Reset" },
        "settings.close" => if ru { "Закрыть" } else { "Close" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

/// Localized name of a primitive kind
pub fn kind_label(kind: shared::PrimitiveKind) -> &'static str {
    use shared::PrimitiveKind;
    match kind {
        PrimitiveKind::Cube => t("prim.cube"),
        PrimitiveKind::Sphere => t("prim.sphere"),
        PrimitiveKind::Cylinder => t("prim.cylinder"),
        PrimitiveKind::Cone => t("prim.cone"),
        PrimitiveKind::Torus => t("prim.torus"),
    }
}

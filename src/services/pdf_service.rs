//! services/pdf_service.rs
//! Conversión HTML → PDF lanzando wkhtmltopdf con concurrencia acotada.

use crate::models::pdf_model::{PdfMargins, PdfOrientation, PdfPagePreset, PdfRequest};
use anyhow::{anyhow, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};
use tempfile::TempDir;
use tokio::{
    process::Command,
    sync::{Semaphore, SemaphorePermit},
    time::timeout,
};
use uuid::Uuid;

/// Tiempo máximo para generar un PDF
const PDF_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);
/// Tiempo máximo esperando turno en el semáforo
const PERMIT_TIMEOUT: Duration = Duration::from_secs(10);
/// Prefijo de carpeta temporal
const TEMP_DIR_PREFIX: &str = "inmobiliaria_pdf_";

#[derive(Clone)]
pub struct PdfService {
    semaphore: Arc<Semaphore>,
    temp_dir: Arc<TempDir>,
    wkhtmltopdf_path: Option<Arc<PathBuf>>,
}

impl PdfService {
    pub fn new(max_procesos: usize) -> Result<Self> {
        // Subdirectorio temporal para HTML/PDF provisionales; se borra al soltar el servicio.
        let temp_dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()
            .context("No se pudo crear el directorio temporal de PDFs")?;

        // Sin wkhtmltopdf el resto del back-office sigue funcionando; solo fallan los reportes.
        let wkhtmltopdf_path = match which::which("wkhtmltopdf") {
            Ok(path) => {
                log::info!("wkhtmltopdf encontrado en {:?}", path);
                Some(Arc::new(path))
            }
            Err(e) => {
                log::warn!("No se encontró wkhtmltopdf en el sistema: {}", e);
                None
            }
        };

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(max_procesos)),
            temp_dir: Arc::new(temp_dir),
            wkhtmltopdf_path,
        })
    }

    pub fn disponible(&self) -> bool {
        self.wkhtmltopdf_path.is_some()
    }

    /// Genera un PDF en memoria (Vec<u8>).
    pub async fn generate_pdf(&self, req: PdfRequest) -> Result<Vec<u8>> {
        let start = Instant::now();
        let binary = self
            .wkhtmltopdf_path
            .clone()
            .ok_or_else(|| anyhow!("wkhtmltopdf no está instalado"))?;

        // Control de concurrencia
        let _guard = self.acquire_permit().await?;

        // Crea archivos temporales (HTML y PDF); se borran al salir de scope
        let temp_files = self.create_temp_files(&req.file_name);
        let _cleanup = TempCleanup::new(temp_files.clone());

        fs::write(&temp_files.html_path, &req.html).with_context(|| {
            format!(
                "Error escribiendo HTML temporal en {:?}",
                temp_files.html_path
            )
        })?;

        let pdf_data = self.run_wkhtmltopdf(&binary, &req, &temp_files).await?;

        log::info!(
            "PDF '{}' generado en {:.2}s ({} bytes)",
            req.file_name,
            start.elapsed().as_secs_f32(),
            pdf_data.len()
        );
        Ok(pdf_data)
    }

    async fn acquire_permit(&self) -> Result<SemaphorePermit<'_>> {
        timeout(PERMIT_TIMEOUT, self.semaphore.acquire())
            .await
            .context("Timeout esperando permiso en PdfService")?
            .map_err(|_| anyhow!("No se pudo adquirir el semaphore"))
    }

    fn create_temp_files(&self, base_name: &str) -> TempFiles {
        let id = Uuid::new_v4().to_string();
        let base = base_name.trim_end_matches(".pdf");
        TempFiles {
            html_path: self.temp_dir.path().join(format!("{}_{}.html", base, id)),
            pdf_path: self.temp_dir.path().join(format!("{}_{}.pdf", base, id)),
        }
    }

    async fn run_wkhtmltopdf(
        &self,
        binary: &Path,
        req: &PdfRequest,
        paths: &TempFiles,
    ) -> Result<Vec<u8>> {
        let mut cmd = Command::new(binary);
        cmd.args(build_args(req));
        cmd.arg(&paths.html_path);
        cmd.arg(&paths.pdf_path);

        cmd.stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(PDF_GENERATION_TIMEOUT, cmd.output())
            .await
            .context("Timeout ejecutando wkhtmltopdf")?
            .context("No se pudo lanzar wkhtmltopdf")?;

        if !output.status.success() {
            let stderr_msg = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("wkhtmltopdf falló: {}", stderr_msg));
        }

        let pdf_bytes = fs::read(&paths.pdf_path)
            .with_context(|| format!("Error leyendo PDF final en {:?}", paths.pdf_path))?;

        Ok(pdf_bytes)
    }
}

/// Argumentos de wkhtmltopdf para la petición (sin las rutas de entrada/salida).
pub fn build_args(req: &PdfRequest) -> Vec<String> {
    let mut args = Vec::new();

    // ===== ORIENTACIÓN =====
    let orientation = match req.orientation.unwrap_or(PdfOrientation::Portrait) {
        PdfOrientation::Landscape => "Landscape",
        PdfOrientation::Portrait => "Portrait",
    };
    args.push("--orientation".to_string());
    args.push(orientation.to_string());

    // ===== TAMAÑO DE PÁGINA =====
    let preset = req.page_size_preset.unwrap_or(PdfPagePreset::A4);
    args.push("--page-size".to_string());
    args.push(preset.as_str().to_string());

    // ===== MÁRGENES =====
    let margins = req.margins.clone().unwrap_or(PdfMargins {
        top: 10.0,
        bottom: 10.0,
        left: 10.0,
        right: 10.0,
    });
    for (flag, value) in [
        ("--margin-top", margins.top),
        ("--margin-bottom", margins.bottom),
        ("--margin-left", margins.left),
        ("--margin-right", margins.right),
    ] {
        args.push(flag.to_string());
        args.push(format!("{}mm", value));
    }

    // ===== ESCALA (zoom) =====
    let scale = req.scale.unwrap_or(1.0);
    if (scale - 1.0).abs() > f64::EPSILON {
        args.push("--zoom".to_string());
        args.push(format!("{}", scale));
    }

    args.push("--encoding".to_string());
    args.push("utf-8".to_string());
    args.push("--print-media-type".to_string());
    args.push("--quiet".to_string());

    args
}

// --------------------------------------------------------------------------------
// Estructuras auxiliares
// --------------------------------------------------------------------------------
#[derive(Clone)]
struct TempFiles {
    html_path: PathBuf,
    pdf_path: PathBuf,
}

struct TempCleanup {
    files: TempFiles,
}

impl TempCleanup {
    fn new(files: TempFiles) -> Self {
        Self { files }
    }
}

/// Borra los archivos temporales al salir de scope
impl Drop for TempCleanup {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.files.html_path);
        let _ = fs::remove_file(&self.files.pdf_path);
    }
}

//! Android torch backend over `android.hardware.camera2.CameraManager`.

use super::CameraService;
use crate::errors::PlatformError;
use crate::types::{CameraCharacteristics, LensFacing};
use jni::objects::{GlobalRef, JObject, JObjectArray, JString, JValue};
use jni::sys::jobject;
use jni::{JNIEnv, JavaVM};
use std::sync::Arc;

const CHARACTERISTICS_CLASS: &str = "android/hardware/camera2/CameraCharacteristics";
const KEY_SIG: &str = "Landroid/hardware/camera2/CameraCharacteristics$Key;";
const ACCESS_EXCEPTION_CLASS: &str = "android/hardware/camera2/CameraAccessException";

/// `CameraAccessException.CAMERA_IN_USE`
const REASON_CAMERA_IN_USE: i32 = 4;
/// `Build.VERSION_CODES.TIRAMISU`, first release with torch strength levels.
const STRENGTH_API_LEVEL: i32 = 33;

pub struct AndroidCameraService {
    java_vm: Arc<JavaVM>,
    camera_manager: GlobalRef,
    sdk_int: i32,
}

impl AndroidCameraService {
    pub fn new() -> Result<Self, PlatformError> {
        let ctx = ndk_context::android_context();
        let java_vm = Arc::new(
            unsafe { JavaVM::from_raw(ctx.vm().cast()) }.map_err(|e| other(e.to_string()))?,
        );

        let (camera_manager, sdk_int) = {
            let mut env = java_vm
                .attach_current_thread()
                .map_err(|e| other(e.to_string()))?;

            if ctx.context().is_null() {
                return Err(other("Android context is not available"));
            }
            let context = unsafe { JObject::from_raw(ctx.context() as jobject) };

            let camera_service = env
                .get_static_field("android/content/Context", "CAMERA_SERVICE", "Ljava/lang/String;")
                .and_then(|v| v.l())
                .map_err(|e| exception(&mut env, e))?;

            let manager = env
                .call_method(
                    &context,
                    "getSystemService",
                    "(Ljava/lang/String;)Ljava/lang/Object;",
                    &[JValue::Object(&camera_service)],
                )
                .and_then(|v| v.l())
                .map_err(|e| exception(&mut env, e))?;

            if manager.is_null() {
                return Err(other("CameraManager is not available"));
            }

            let sdk_int = env
                .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
                .and_then(|v| v.i())
                .map_err(|e| exception(&mut env, e))?;

            let manager = env
                .new_global_ref(manager)
                .map_err(|e| other(e.to_string()))?;
            (manager, sdk_int)
        };

        log::debug!("CameraManager obtained (SDK {})", sdk_int);

        Ok(Self {
            java_vm,
            camera_manager,
            sdk_int,
        })
    }

    fn with_env<T>(
        &self,
        f: impl FnOnce(&mut JNIEnv) -> jni::errors::Result<T>,
    ) -> Result<T, PlatformError> {
        let mut env = self
            .java_vm
            .attach_current_thread()
            .map_err(|e| other(e.to_string()))?;
        f(&mut env).map_err(|e| exception(&mut env, e))
    }
}

impl CameraService for AndroidCameraService {
    fn camera_ids(&self) -> Result<Vec<String>, PlatformError> {
        let manager = self.camera_manager.as_obj();
        self.with_env(|env| {
            let ids = env
                .call_method(manager, "getCameraIdList", "()[Ljava/lang/String;", &[])?
                .l()?;
            let ids = JObjectArray::from(ids);
            let len = env.get_array_length(&ids)?;

            let mut camera_ids: Vec<String> = Vec::with_capacity(len as usize);
            for i in 0..len {
                let id = JString::from(env.get_object_array_element(&ids, i)?);
                camera_ids.push(env.get_string(&id)?.into());
            }
            Ok(camera_ids)
        })
    }

    fn characteristics(&self, camera_id: &str) -> Result<CameraCharacteristics, PlatformError> {
        let manager = self.camera_manager.as_obj();
        let read_strength = self.supports_strength_control();
        self.with_env(|env| {
            let id = env.new_string(camera_id)?;
            let characteristics = env
                .call_method(
                    manager,
                    "getCameraCharacteristics",
                    "(Ljava/lang/String;)Landroid/hardware/camera2/CameraCharacteristics;",
                    &[JValue::Object(&id)],
                )?
                .l()?;

            let has_flash = characteristic(env, &characteristics, "FLASH_INFO_AVAILABLE")?;
            let has_flash = if has_flash.is_null() {
                false
            } else {
                env.call_method(&has_flash, "booleanValue", "()Z", &[])?.z()?
            };

            let facing = characteristic(env, &characteristics, "LENS_FACING")?;
            let facing = if facing.is_null() {
                LensFacing::Unknown
            } else {
                LensFacing::from_platform(env.call_method(&facing, "intValue", "()I", &[])?.i()?)
            };

            let max_strength_level = if read_strength {
                let max = characteristic(env, &characteristics, "FLASH_INFO_STRENGTH_MAXIMUM_LEVEL")?;
                if max.is_null() {
                    None
                } else {
                    let max = env.call_method(&max, "intValue", "()I", &[])?.i()?;
                    u32::try_from(max).ok().filter(|&level| level > 0)
                }
            } else {
                None
            };

            Ok(CameraCharacteristics {
                has_flash,
                facing,
                max_strength_level,
            })
        })
    }

    fn set_torch_mode(&self, camera_id: &str, enabled: bool) -> Result<(), PlatformError> {
        let manager = self.camera_manager.as_obj();
        self.with_env(|env| {
            let id = env.new_string(camera_id)?;
            env.call_method(
                manager,
                "setTorchMode",
                "(Ljava/lang/String;Z)V",
                &[JValue::Object(&id), JValue::Bool(enabled.into())],
            )?;
            Ok(())
        })
    }

    fn set_torch_strength(&self, camera_id: &str, level: u32) -> Result<(), PlatformError> {
        let level = i32::try_from(level).map_err(|_| other(format!("Invalid strength level {}", level)))?;
        let manager = self.camera_manager.as_obj();
        self.with_env(|env| {
            let id = env.new_string(camera_id)?;
            env.call_method(
                manager,
                "turnOnTorchWithStrengthLevel",
                "(Ljava/lang/String;I)V",
                &[JValue::Object(&id), JValue::Int(level)],
            )?;
            Ok(())
        })
    }

    fn supports_strength_control(&self) -> bool {
        self.sdk_int >= STRENGTH_API_LEVEL
    }
}

fn characteristic<'local>(
    env: &mut JNIEnv<'local>,
    characteristics: &JObject,
    key: &str,
) -> jni::errors::Result<JObject<'local>> {
    let key = env.get_static_field(CHARACTERISTICS_CLASS, key, KEY_SIG)?.l()?;
    env.call_method(
        characteristics,
        "get",
        "(Landroid/hardware/camera2/CameraCharacteristics$Key;)Ljava/lang/Object;",
        &[JValue::Object(&key)],
    )?
    .l()
}

fn other(message: impl Into<String>) -> PlatformError {
    PlatformError::Other(message.into())
}

/// Turn a failed JNI call into a platform error, clearing any pending Java
/// exception so the thread can keep calling into the VM.
fn exception(env: &mut JNIEnv, error: jni::errors::Error) -> PlatformError {
    if !matches!(error, jni::errors::Error::JavaException) {
        return other(error.to_string());
    }

    let throwable = match env.exception_occurred() {
        Ok(throwable) => throwable,
        Err(e) => return other(e.to_string()),
    };
    let _ = env.exception_clear();

    let message = env
        .call_method(&throwable, "getMessage", "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
        .ok()
        .filter(|m| !m.is_null())
        .and_then(|m| env.get_string(&JString::from(m)).ok().map(String::from))
        .unwrap_or_else(|| "unknown camera error".to_string());

    let is_access = env
        .is_instance_of(&throwable, ACCESS_EXCEPTION_CLASS)
        .unwrap_or(false);
    if !is_access {
        return PlatformError::Other(message);
    }

    let reason = env
        .call_method(&throwable, "getReason", "()I", &[])
        .and_then(|v| v.i())
        .unwrap_or_default();
    let _ = env.exception_clear();

    if reason == REASON_CAMERA_IN_USE {
        log::error!("Torch is not available because the camera is in use by another application.");
        PlatformError::DeviceBusy(message)
    } else {
        PlatformError::Access(message)
    }
}
